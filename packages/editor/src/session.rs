//! # Editor Session
//!
//! One open script and everything the editor tracks around it: the selection,
//! the element kind being typed, the autocomplete index and the last status
//! message.
//!
//! The caret survives structural rewrites because it addresses lines by
//! identity. When its line disappears (merged away, page removed, undo) the
//! session falls back to the nearest line at the last known position.

use crate::autocomplete::AutocompleteIndex;
use crate::caret::{fallback, resolve, Caret, ResolvedCaret, Selection};
use crate::debounce::Debouncer;
use crate::elements::smart_default_at;
use crate::metrics::OverflowOracle;
use crate::pagination::{paginate, PaginationReport};
use crate::settings::Settings;
use crate::undo_stack::Checkpoint;
use crate::Document;
use slugline_parser::{Document as ASTDocument, ElementKind, LinePos};
use tracing::{debug, warn};

/// Editing state for one open document
#[derive(Debug, Clone)]
pub struct EditorSession {
    /// Unique session identifier
    pub id: String,

    /// Document being edited
    pub document: Document,

    /// Kind applied to new lines and shown in the element picker
    pub active_kind: ElementKind,

    settings: Settings,
    selection: Option<Selection>,

    /// Last position the caret resolved to, used for fallback
    last_pos: LinePos,

    index: AutocompleteIndex,
    reindex: Debouncer,
    status: Option<String>,
}

impl EditorSession {
    /// Open a session with the caret at the start of the first line
    pub fn new(id: impl Into<String>, document: Document, settings: Settings) -> Self {
        let index = AutocompleteIndex::rebuild(document.ast()).with_quick_picks(&settings);
        let first = document.ast().lines().next().map(|line| (line.id, line.kind));

        Self {
            id: id.into(),
            document,
            active_kind: first.map_or(ElementKind::Action, |(_, kind)| kind),
            settings,
            selection: first.map(|(id, _)| Selection::collapsed(Caret::start_of(id))),
            last_pos: LinePos::default(),
            index,
            reindex: Debouncer::default(),
            status: None,
        }
    }

    pub fn ast(&self) -> &ASTDocument {
        self.document.ast()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.index.set_quick_picks(&settings);
        self.settings = settings;
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn caret(&self) -> Option<Caret> {
        self.selection.map(|selection| selection.caret())
    }

    pub fn last_pos(&self) -> LinePos {
        self.last_pos
    }

    pub fn set_selection(&mut self, selection: Selection) {
        if let Some(resolved) = resolve(self.document.ast(), selection.focus) {
            self.last_pos = resolved.pos;
        }
        self.selection = Some(selection);
    }

    pub fn set_caret(&mut self, caret: Caret) {
        self.set_selection(Selection::collapsed(caret));
    }

    /// Locate the caret, falling back to the nearest line when its line is
    /// gone. `None` only when the document has no lines at all.
    pub fn resolve_caret(&mut self) -> Option<ResolvedCaret> {
        if let Some(resolved) = self
            .selection
            .and_then(|selection| resolve(self.document.ast(), selection.focus))
        {
            self.last_pos = resolved.pos;
            return Some(resolved);
        }

        let resolved = fallback(self.document.ast(), self.last_pos)?;
        if self.selection.is_some() {
            warn!(
                page = self.last_pos.page,
                index = self.last_pos.index,
                "caret line no longer exists, moving to nearest line"
            );
        }
        self.selection = Some(Selection::collapsed(resolved.caret()));
        self.last_pos = resolved.pos;
        Some(resolved)
    }

    /// Resolve the caret, first synthesizing a blank line of the active kind
    /// when the document is empty
    pub fn ensure_line(&mut self) -> ResolvedCaret {
        if let Some(resolved) = self.resolve_caret() {
            return resolved;
        }

        let ast = self.document.ast_mut();
        let line = ast.new_line(self.active_kind, "");
        let id = line.id;
        let pos = ast.push_line(0, line).unwrap_or_default();
        debug!(kind = %self.active_kind.as_str(), "synthesized line for empty document");

        self.selection = Some(Selection::collapsed(Caret::start_of(id)));
        self.last_pos = pos;
        ResolvedCaret {
            line: id,
            pos,
            offset: 0,
        }
    }

    /// Sync the active kind with the caret's line, applying smart blank-line
    /// defaults. Returns true when the line was retagged.
    pub fn update_current_element(&mut self) -> bool {
        let Some(caret) = self.resolve_caret() else {
            return false;
        };

        if self.settings.smart_blank_line_defaults {
            if let Some(kind) = smart_default_at(self.document.ast(), caret.pos) {
                if let Some(line) = self.document.ast_mut().line_mut(caret.pos) {
                    line.kind = kind;
                }
                debug!(kind = %kind.as_str(), "smart default for blank line");
                self.active_kind = kind;
                return true;
            }
        }

        self.sync_active_kind();
        false
    }

    /// Take the active kind from the caret's line without retagging anything
    pub fn sync_active_kind(&mut self) {
        if let Some(kind) = self
            .resolve_caret()
            .and_then(|caret| self.document.ast().line(caret.pos))
            .map(|line| line.kind)
        {
            self.active_kind = kind;
        }
    }

    /// Re-flow the pages and restore the caret.
    ///
    /// A pass that changes nothing leaves the dirty flag as it was.
    pub fn paginate<O>(&mut self, oracle: &O) -> PaginationReport
    where
        O: OverflowOracle + ?Sized,
    {
        let was_dirty = self.document.is_dirty();
        let report = paginate(self.document.ast_mut(), oracle, &self.settings);
        if !report.changed() {
            self.document.set_dirty(was_dirty);
        }
        self.resolve_caret();
        report
    }

    pub fn index(&self) -> &AutocompleteIndex {
        &self.index
    }

    /// Suggestions for the caret's line
    pub fn suggestions(&self) -> Vec<String> {
        let text = self
            .caret()
            .and_then(|caret| resolve(self.document.ast(), caret))
            .and_then(|caret| self.document.ast().line(caret.pos))
            .map(|line| line.text.as_str())
            .unwrap_or_default();
        self.index.suggest(self.active_kind, text)
    }

    pub fn schedule_reindex(&mut self, now_ms: u64) {
        self.reindex.schedule(now_ms);
    }

    pub fn reindex_pending(&self) -> bool {
        self.reindex.is_pending()
    }

    /// Run the debounced reindex when it is due. Returns true when it ran.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.reindex.poll(now_ms) {
            return false;
        }
        self.index.refresh(self.document.ast());
        debug!(
            characters = self.index.characters().count(),
            locations = self.index.locations().count(),
            "autocomplete index rebuilt"
        );
        true
    }

    /// Rebuild the index immediately, dropping any pending run
    pub fn rebuild_index(&mut self) {
        self.reindex.cancel();
        self.index.refresh(self.document.ast());
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    /// Snapshot for the undo stack
    pub fn checkpoint(&self, label: impl Into<String>) -> Checkpoint {
        Checkpoint {
            pages: self.document.ast().snapshot_pages(),
            selection: self.selection,
            last_pos: self.last_pos,
            active_kind: self.active_kind,
            label: label.into(),
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.document.ast_mut().restore_pages(checkpoint.pages);
        self.selection = checkpoint.selection;
        self.last_pos = checkpoint.last_pos;
        self.active_kind = checkpoint.active_kind;
        self.resolve_caret();
    }
}
