//! # Undo/Redo Stack
//!
//! Snapshot history of the page store.
//!
//! ## Design
//!
//! - A checkpoint is taken *before* each edit and holds the pages (with line
//!   identities) plus the selection
//! - Typing coalesces: repeated inputs of the same kind within
//!   [`COALESCE_WINDOW_MS`] share one checkpoint until whitespace or sentence
//!   punctuation is typed
//! - Structural inputs (format, new paragraph, paste, cut, restore) always
//!   get their own checkpoint
//! - A checkpoint identical to the previous one is skipped
//! - New checkpoints clear the redo stack
//! - Batches record one checkpoint for a multi-step change

use crate::caret::Selection;
use serde::{Deserialize, Serialize};
use slugline_parser::{ElementKind, LinePos, Page};

pub const DEFAULT_MAX_LEVELS: usize = 200;
pub const COALESCE_WINDOW_MS: u64 = 900;

/// Kind of input that triggered a checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    InsertText,
    DeleteContent,
    InsertParagraph,
    Format,
    Paste,
    Cut,
    Restore,
}

impl InputKind {
    pub fn is_structural(&self) -> bool {
        !matches!(self, InputKind::InsertText | InputKind::DeleteContent)
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputKind::InsertText | InputKind::InsertParagraph | InputKind::Paste => "Typing",
            InputKind::DeleteContent | InputKind::Cut => "Delete",
            InputKind::Format => "Format",
            InputKind::Restore => "Restore",
        }
    }
}

/// Restorable editor state
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub pages: Vec<Page>,
    pub selection: Option<Selection>,
    pub last_pos: LinePos,
    pub active_kind: ElementKind,
    pub label: String,
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Most recent last
    undo_stack: Vec<Checkpoint>,
    redo_stack: Vec<Checkpoint>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    batch_depth: usize,
    last_input: Option<InputKind>,
    last_record_at: Option<u64>,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoStack {
    /// Create a new undo stack with default max levels (200)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            batch_depth: 0,
            last_input: None,
            last_record_at: None,
        }
    }

    /// Record the state before an edit.
    ///
    /// `data` is the typed text, used to break coalescing at word and
    /// sentence boundaries. Returns true when a checkpoint was pushed.
    pub fn record(&mut self, checkpoint: Checkpoint, input: InputKind, data: Option<&str>, now_ms: u64) -> bool {
        if self.should_coalesce(input, data, now_ms) {
            return false;
        }
        self.push_checkpoint(checkpoint, input, now_ms)
    }

    fn should_coalesce(&self, input: InputKind, data: Option<&str>, now_ms: u64) -> bool {
        if self.batch_depth > 0 {
            return true;
        }
        if input.is_structural() {
            return false;
        }

        let same_kind = self.last_input == Some(input);
        let within_window = self
            .last_record_at
            .is_some_and(|at| now_ms.saturating_sub(at) < COALESCE_WINDOW_MS);
        if !same_kind || !within_window {
            return false;
        }

        let breaks_word = data.is_some_and(|text| {
            text.chars()
                .any(|c| c.is_whitespace() || matches!(c, '.' | '!' | '?'))
        });
        !breaks_word
    }

    fn push_checkpoint(&mut self, checkpoint: Checkpoint, input: InputKind, now_ms: u64) -> bool {
        if self
            .undo_stack
            .last()
            .is_some_and(|last| last.pages == checkpoint.pages)
        {
            return false;
        }

        self.undo_stack.push(checkpoint);
        self.trim();
        self.redo_stack.clear();
        self.last_input = Some(input);
        self.last_record_at = Some(now_ms);
        true
    }

    fn trim(&mut self) {
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            let excess = self.undo_stack.len() - self.max_levels;
            self.undo_stack.drain(..excess);
        }
    }

    /// Start a batch: record once now, then ignore checkpoints until
    /// [`UndoStack::end_batch`]
    pub fn begin_batch(&mut self, checkpoint: Checkpoint, input: InputKind, now_ms: u64) {
        if self.batch_depth == 0 {
            self.push_checkpoint(checkpoint, input, now_ms);
        }
        self.batch_depth += 1;
    }

    pub fn end_batch(&mut self) {
        self.batch_depth = self.batch_depth.saturating_sub(1);
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    /// Swap `current` for the previous checkpoint
    pub fn undo(&mut self, current: Checkpoint) -> Option<Checkpoint> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        self.last_input = None;
        Some(previous)
    }

    /// Swap `current` for the next checkpoint
    pub fn redo(&mut self, current: Checkpoint) -> Option<Checkpoint> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        self.trim();
        self.last_input = None;
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Label of the checkpoint the next undo restores
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.label.as_str())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.batch_depth = 0;
        self.last_input = None;
        self.last_record_at = None;
    }
}
