//! # Caret Model
//!
//! Carets address a line by identity and a char offset into its text, never a
//! node path. Structural rewrites (re-classification, page moves, undo) keep
//! line identities, so a caret can be restored deterministically afterwards.
//!
//! When the addressed line is gone, the caret falls back to the end of the
//! nearest still-valid line. Restoration never fails while the document has
//! at least one line.

use serde::{Deserialize, Serialize};
use slugline_parser::{Document, LineId, LinePos};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Caret {
    pub line: LineId,
    pub offset: usize,
}

impl Caret {
    pub fn new(line: LineId, offset: usize) -> Self {
        Self { line, offset }
    }

    pub fn start_of(line: LineId) -> Self {
        Self::new(line, 0)
    }
}

/// Anchor/focus pair; collapsed when both ends are equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Caret,
    pub focus: Caret,
}

impl Selection {
    pub fn collapsed(caret: Caret) -> Self {
        Self {
            anchor: caret,
            focus: caret,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The insertion point
    pub fn caret(&self) -> Caret {
        self.focus
    }

    /// Both ends resolved and sorted into document order
    pub fn ordered(&self, doc: &Document) -> Option<(ResolvedCaret, ResolvedCaret)> {
        let a = resolve(doc, self.anchor)?;
        let b = resolve(doc, self.focus)?;
        if (a.pos, a.offset) <= (b.pos, b.offset) {
            Some((a, b))
        } else {
            Some((b, a))
        }
    }
}

/// A caret located in the current document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCaret {
    pub line: LineId,
    pub pos: LinePos,
    pub offset: usize,
}

impl ResolvedCaret {
    pub fn caret(&self) -> Caret {
        Caret::new(self.line, self.offset)
    }
}

/// Locate a caret, clamping its offset to the line's length
pub fn resolve(doc: &Document, caret: Caret) -> Option<ResolvedCaret> {
    let pos = doc.locate(caret.line)?;
    let line = doc.line(pos)?;
    Some(ResolvedCaret {
        line: caret.line,
        pos,
        offset: caret.offset.min(line.char_len()),
    })
}

/// End of the line nearest to `near`, for when the caret's line is gone
pub fn fallback(doc: &Document, near: LinePos) -> Option<ResolvedCaret> {
    let page_count = doc.page_count();
    if page_count == 0 {
        return None;
    }
    let start_page = near.page.min(page_count - 1);

    let pos = doc
        .page(start_page)
        .filter(|page| !page.is_empty())
        .map(|page| LinePos::new(start_page, near.index.min(page.len() - 1)))
        .or_else(|| {
            (0..start_page)
                .rev()
                .find_map(|p| doc.page(p).filter(|page| !page.is_empty()).map(|page| LinePos::new(p, page.len() - 1)))
        })
        .or_else(|| {
            (start_page + 1..page_count)
                .find(|&p| doc.page(p).is_some_and(|page| !page.is_empty()))
                .map(|p| LinePos::new(p, 0))
        })?;

    let line = doc.line(pos)?;
    Some(ResolvedCaret {
        line: line.id,
        pos,
        offset: line.char_len(),
    })
}

/// Byte index of a char offset, clamped to the end of the text
pub fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(index, _)| index)
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
