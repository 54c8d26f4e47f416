//! # Editing Operations
//!
//! Every user intent the editor understands, applied to an
//! [`EditorSession`]. Mutations edit lines in place and never re-flow pages;
//! pagination, casing and dual-group cleanup run afterwards in the
//! [`Pipeline`](crate::Pipeline).
//!
//! ## Semantics
//!
//! ### Enter
//! - Text after the caret moves to a new line of the same kind
//! - At the end of a line the new kind follows the element state model; a new
//!   character cue may be pre-filled with the previous speaker, fully selected
//! - The new line is inserted on the same page
//!
//! ### Backspace
//! - At the start of a page: caret jumps to the end of the previous page, and
//!   the page is removed when all of its lines are blank
//! - At the start of any other line: merges into the line above
//!
//! ### Delete
//! - At the end of a line: merges the next line on the same page
//!
//! Any non-collapsed selection is deleted first, across lines and pages.

use crate::caret::{byte_index, Caret, ResolvedCaret, Selection};
use crate::dual_dialogue::toggle_dual_dialogue;
use crate::elements::{next_in_cycle, next_on_enter, previous_character_name, reclassify};
use crate::session::EditorSession;
use crate::undo_stack::InputKind;
use serde::{Deserialize, Serialize};
use slugline_parser::{Document, ElementKind, LineId, LinePos};
use thiserror::Error;
use tracing::debug;

/// Editing operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Type or paste text at the caret; newlines act as Enter
    InsertText { text: String },

    Enter,
    Backspace,
    Delete,

    /// Re-classify the caret's line
    SetElement { kind: ElementKind },

    /// Re-classify the caret's line to the next kind in tab order
    CycleElement,

    ToggleDualDialogue,

    /// Replace the caret's line with an autocomplete suggestion
    ApplySuggestion { index: usize },

    MoveCaret { caret: Caret },

    Select { anchor: Caret, focus: Caret },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("Line not found: {0:?}")]
    LineNotFound(LineId),

    #[error("Text contains control character {0:?}")]
    InvalidText(char),

    #[error("No suggestion at index {index} ({available} available)")]
    SuggestionOutOfRange { index: usize, available: usize },
}

/// What an applied mutation did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationResult {
    /// Lines or pages changed
    pub changed: bool,

    /// Message for the status bar
    pub status: Option<String>,
}

impl MutationResult {
    fn changed() -> Self {
        Self {
            changed: true,
            status: None,
        }
    }

    fn unchanged() -> Self {
        Self::default()
    }
}

impl Mutation {
    /// History category; `None` for caret movement, which is never recorded
    pub fn input_kind(&self) -> Option<InputKind> {
        match self {
            Mutation::InsertText { text } if text.contains(['\n', '\r']) => Some(InputKind::Paste),
            Mutation::InsertText { .. } => Some(InputKind::InsertText),
            Mutation::Enter => Some(InputKind::InsertParagraph),
            Mutation::Backspace | Mutation::Delete => Some(InputKind::DeleteContent),
            Mutation::SetElement { .. }
            | Mutation::CycleElement
            | Mutation::ToggleDualDialogue
            | Mutation::ApplySuggestion { .. } => Some(InputKind::Format),
            Mutation::MoveCaret { .. } | Mutation::Select { .. } => None,
        }
    }

    /// Typed text, for undo coalescing
    pub fn data(&self) -> Option<&str> {
        match self {
            Mutation::InsertText { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_content_mutation(&self) -> bool {
        self.input_kind().is_some()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mutation::InsertText { .. } => "Typing",
            Mutation::Enter => "New line",
            Mutation::Backspace | Mutation::Delete => "Delete",
            Mutation::SetElement { .. } | Mutation::CycleElement => "Change element",
            Mutation::ToggleDualDialogue => "Dual dialogue",
            Mutation::ApplySuggestion { .. } => "Autocomplete",
            Mutation::MoveCaret { .. } | Mutation::Select { .. } => "Move caret",
        }
    }

    /// Check the mutation against the session without changing anything
    pub fn validate(&self, session: &EditorSession) -> Result<(), MutationError> {
        match self {
            Mutation::InsertText { text } => {
                match text.chars().find(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t')) {
                    Some(c) => Err(MutationError::InvalidText(c)),
                    None => Ok(()),
                }
            }
            Mutation::ApplySuggestion { index } => {
                let available = session.suggestions().len();
                if *index < available {
                    Ok(())
                } else {
                    Err(MutationError::SuggestionOutOfRange {
                        index: *index,
                        available,
                    })
                }
            }
            Mutation::MoveCaret { caret } => ensure_exists(session.ast(), caret.line),
            Mutation::Select { anchor, focus } => {
                ensure_exists(session.ast(), anchor.line)?;
                ensure_exists(session.ast(), focus.line)
            }
            _ => Ok(()),
        }
    }

    /// Validate and apply to the session
    pub fn apply(&self, session: &mut EditorSession) -> Result<MutationResult, MutationError> {
        self.validate(session)?;
        debug!(mutation = self.label(), "applying");

        match self {
            Mutation::InsertText { text } => insert_text(session, text),
            Mutation::Enter => enter(session),
            Mutation::Backspace => backspace(session),
            Mutation::Delete => delete_forward(session),
            Mutation::SetElement { kind } => set_element(session, *kind),
            Mutation::CycleElement => {
                let caret = session.ensure_line();
                let kind = session
                    .ast()
                    .line(caret.pos)
                    .map_or(session.active_kind, |line| line.kind);
                set_element(session, next_in_cycle(kind))
            }
            Mutation::ToggleDualDialogue => toggle_dual(session),
            Mutation::ApplySuggestion { index } => apply_suggestion(session, *index),
            Mutation::MoveCaret { caret } => Ok(select(session, Selection::collapsed(*caret))),
            Mutation::Select { anchor, focus } => Ok(select(
                session,
                Selection {
                    anchor: *anchor,
                    focus: *focus,
                },
            )),
        }
    }
}

fn ensure_exists(doc: &Document, id: LineId) -> Result<(), MutationError> {
    doc.locate(id)
        .map(|_| ())
        .ok_or(MutationError::LineNotFound(id))
}

fn line_not_found(caret: &ResolvedCaret) -> MutationError {
    MutationError::LineNotFound(caret.line)
}

/// Delete a non-collapsed selection and return the collapsed caret
fn collapse_selection(session: &mut EditorSession) -> Result<ResolvedCaret, MutationError> {
    let caret = session.ensure_line();
    let Some(selection) = session.selection().filter(|s| !s.is_collapsed()) else {
        return Ok(caret);
    };
    let Some((start, end)) = selection.ordered(session.ast()) else {
        session.set_caret(caret.caret());
        return Ok(caret);
    };

    delete_range(session.document.ast_mut(), start, end)?;
    session.set_caret(start.caret());
    Ok(start)
}

/// Remove text between two resolved carets, merging the end line's remainder
/// into the start line
fn delete_range(doc: &mut Document, start: ResolvedCaret, end: ResolvedCaret) -> Result<(), MutationError> {
    if start.line == end.line {
        let line = doc.line_mut(start.pos).ok_or_else(|| line_not_found(&start))?;
        let from = byte_index(&line.text, start.offset);
        let to = byte_index(&line.text, end.offset);
        line.text.replace_range(from..to, "");
        return Ok(());
    }

    let tail = {
        let line = doc.line(end.pos).ok_or_else(|| line_not_found(&end))?;
        line.text[byte_index(&line.text, end.offset)..].to_string()
    };

    let doomed: Vec<LineId> = doc
        .positions()
        .filter(|(pos, _)| *pos > start.pos && *pos <= end.pos)
        .map(|(_, line)| line.id)
        .collect();
    for id in doomed {
        if let Some(pos) = doc.locate(id) {
            doc.remove_line(pos);
        }
    }

    let line = doc.line_mut(start.pos).ok_or_else(|| line_not_found(&start))?;
    line.text.truncate(byte_index(&line.text, start.offset));
    line.text.push_str(&tail);
    Ok(())
}

fn insert_at(session: &mut EditorSession, caret: ResolvedCaret, text: &str) -> Result<(), MutationError> {
    let line = session
        .document
        .ast_mut()
        .line_mut(caret.pos)
        .ok_or_else(|| line_not_found(&caret))?;
    line.text.insert_str(byte_index(&line.text, caret.offset), text);
    session.set_caret(Caret::new(caret.line, caret.offset + text.chars().count()));
    Ok(())
}

fn insert_text(session: &mut EditorSession, text: &str) -> Result<MutationResult, MutationError> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    for (i, segment) in text.split('\n').enumerate() {
        if i > 0 {
            enter(session)?;
        }
        let caret = collapse_selection(session)?;
        if !segment.is_empty() {
            insert_at(session, caret, segment)?;
        }
    }
    Ok(MutationResult::changed())
}

fn enter(session: &mut EditorSession) -> Result<MutationResult, MutationError> {
    let caret = collapse_selection(session)?;
    let settings = session.settings().clone();
    let active = session.active_kind;
    let doc = session.document.ast_mut();

    let (current_kind, trailing, line_is_blank) = {
        let line = doc.line_mut(caret.pos).ok_or_else(|| line_not_found(&caret))?;
        let trailing = line.text.split_off(byte_index(&line.text, caret.offset));
        (line.kind, trailing, line.is_blank())
    };

    // (kind, text, chars pre-selected)
    let (kind, text, selected) = if !trailing.is_empty() {
        (current_kind, trailing, 0)
    } else {
        let kind = next_on_enter(active, line_is_blank, &settings);
        let name = (kind == ElementKind::Character && settings.dialogue_continue_name)
            .then(|| previous_character_name(doc, caret.pos))
            .flatten()
            .unwrap_or_default();
        let selected = name.chars().count();
        (kind, name, selected)
    };

    let line = doc.new_line(kind, text);
    let id = line.id;
    doc.insert_line(LinePos::new(caret.pos.page, caret.pos.index + 1), line)
        .ok_or_else(|| line_not_found(&caret))?;

    session.set_selection(Selection {
        anchor: Caret::start_of(id),
        focus: Caret::new(id, selected),
    });
    session.active_kind = kind;
    Ok(MutationResult::changed())
}

fn backspace(session: &mut EditorSession) -> Result<MutationResult, MutationError> {
    if session.selection().is_some_and(|s| !s.is_collapsed()) {
        collapse_selection(session)?;
        return Ok(MutationResult::changed());
    }

    let caret = session.ensure_line();
    if caret.offset > 0 {
        let line = session
            .document
            .ast_mut()
            .line_mut(caret.pos)
            .ok_or_else(|| line_not_found(&caret))?;
        let from = byte_index(&line.text, caret.offset - 1);
        let to = byte_index(&line.text, caret.offset);
        line.text.replace_range(from..to, "");
        session.set_caret(Caret::new(caret.line, caret.offset - 1));
        return Ok(MutationResult::changed());
    }

    if caret.pos.index == 0 {
        return Ok(jump_to_previous_page(session, caret));
    }

    let prev_pos = LinePos::new(caret.pos.page, caret.pos.index - 1);
    let doc = session.document.ast_mut();
    let current = doc.remove_line(caret.pos).ok_or_else(|| line_not_found(&caret))?;
    let prev = doc.line_mut(prev_pos).ok_or_else(|| line_not_found(&caret))?;
    let offset = prev.char_len();
    prev.text.push_str(&current.text);
    let target = Caret::new(prev.id, offset);
    session.set_caret(target);
    Ok(MutationResult::changed())
}

/// Backspace at the start of a page
fn jump_to_previous_page(session: &mut EditorSession, caret: ResolvedCaret) -> MutationResult {
    let Some(prev_page) = caret.pos.page.checked_sub(1) else {
        return MutationResult::unchanged();
    };
    let Some(target) = session
        .ast()
        .page(prev_page)
        .and_then(|page| page.last())
        .map(|line| Caret::new(line.id, line.char_len()))
    else {
        return MutationResult::unchanged();
    };

    let remove = session
        .ast()
        .page(caret.pos.page)
        .is_some_and(|page| page.is_blank());
    if remove {
        session.document.ast_mut().remove_page(caret.pos.page);
        debug!(page = caret.pos.page, "removed blank page");
    }

    session.set_caret(target);
    MutationResult {
        changed: remove,
        status: None,
    }
}

fn delete_forward(session: &mut EditorSession) -> Result<MutationResult, MutationError> {
    if session.selection().is_some_and(|s| !s.is_collapsed()) {
        collapse_selection(session)?;
        return Ok(MutationResult::changed());
    }

    let caret = session.ensure_line();
    let doc = session.document.ast_mut();
    let len = doc.line(caret.pos).map_or(0, |line| line.char_len());

    if caret.offset < len {
        let line = doc.line_mut(caret.pos).ok_or_else(|| line_not_found(&caret))?;
        let from = byte_index(&line.text, caret.offset);
        let to = byte_index(&line.text, caret.offset + 1);
        line.text.replace_range(from..to, "");
        return Ok(MutationResult::changed());
    }

    let next_pos = LinePos::new(caret.pos.page, caret.pos.index + 1);
    let Some(next) = doc.remove_line(next_pos) else {
        return Ok(MutationResult::unchanged());
    };
    let line = doc.line_mut(caret.pos).ok_or_else(|| line_not_found(&caret))?;
    line.text.push_str(&next.text);
    session.set_caret(caret.caret());
    Ok(MutationResult::changed())
}

fn set_element(session: &mut EditorSession, kind: ElementKind) -> Result<MutationResult, MutationError> {
    let caret = session.ensure_line();
    let settings = session.settings().clone();
    let line = session
        .document
        .ast_mut()
        .line_mut(caret.pos)
        .ok_or_else(|| line_not_found(&caret))?;

    let offset = reclassify(line, kind, caret.offset, &settings);
    session.set_caret(Caret::new(caret.line, offset));
    session.active_kind = kind;
    Ok(MutationResult::changed())
}

fn toggle_dual(session: &mut EditorSession) -> Result<MutationResult, MutationError> {
    let caret = session.ensure_line();
    let selection = session
        .selection()
        .unwrap_or_else(|| Selection::collapsed(caret.caret()));

    let outcome = toggle_dual_dialogue(session.document.ast_mut(), &selection);
    session.set_status(outcome.status());
    Ok(MutationResult {
        changed: outcome.changed(),
        status: Some(outcome.status().to_string()),
    })
}

fn apply_suggestion(session: &mut EditorSession, index: usize) -> Result<MutationResult, MutationError> {
    let suggestions = session.suggestions();
    let suggestion = suggestions
        .get(index)
        .ok_or(MutationError::SuggestionOutOfRange {
            index,
            available: suggestions.len(),
        })?
        .clone();

    let caret = session.ensure_line();
    let line = session
        .document
        .ast_mut()
        .line_mut(caret.pos)
        .ok_or_else(|| line_not_found(&caret))?;
    let len = suggestion.chars().count();
    line.text = suggestion;
    session.set_caret(Caret::new(caret.line, len));
    Ok(MutationResult::changed())
}

fn select(session: &mut EditorSession, selection: Selection) -> MutationResult {
    session.set_selection(selection);
    MutationResult {
        changed: session.update_current_element(),
        status: None,
    }
}
