//! # Dual-Dialogue Grouper
//!
//! A dialogue block is a `character` line followed by `parenthetical` and
//! `dialogue` lines, up to the next cue or any other kind. It only counts when
//! it holds at least one `dialogue` line.
//!
//! Two blocks on one page can be paired for side-by-side printing. Pairing
//! tags every line of the left block `Left` and every line of the right block
//! `Right` under a fresh group id, and removes the blank action lines between
//! them so the group stays print-contiguous. Toggling a grouped block again
//! clears the group.

use crate::caret::{resolve, Selection};
use slugline_parser::{Document, DualGroupId, DualSide, DualTag, ElementKind, LinePos};
use std::collections::BTreeMap;
use std::ops::Range;
use tracing::debug;

/// A run of dialogue lines on one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueBlock {
    pub page: usize,
    pub start: usize,
    /// Exclusive
    pub end: usize,
}

impl DialogueBlock {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Group of the block's cue line
    pub fn group(&self, doc: &Document) -> Option<DualGroupId> {
        doc.line(LinePos::new(self.page, self.start))?
            .dual
            .map(|tag| tag.group)
    }
}

/// Result of a dual-dialogue toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DualToggle {
    Paired(DualGroupId),
    Unpaired(DualGroupId),
    NotInDialogue,
    NoPartner,
}

impl DualToggle {
    pub fn changed(&self) -> bool {
        matches!(self, DualToggle::Paired(_) | DualToggle::Unpaired(_))
    }

    /// Status line shown to the writer
    pub fn status(&self) -> &'static str {
        match self {
            DualToggle::Paired(_) => "Dual dialogue: On",
            DualToggle::Unpaired(_) => "Dual dialogue: Off",
            DualToggle::NotInDialogue => "Dual dialogue: place cursor in dialogue",
            DualToggle::NoPartner => "Dual dialogue: needs two nearby dialogue blocks",
        }
    }
}

/// The dialogue block containing the line at `pos`
pub fn block_at(doc: &Document, pos: LinePos) -> Option<DialogueBlock> {
    let lines = doc.page(pos.page)?.lines();
    if !lines.get(pos.index)?.kind.is_dialogueish() {
        return None;
    }

    let mut start = pos.index;
    while lines[start].kind != ElementKind::Character {
        if start == 0 || !lines[start - 1].kind.is_dialogueish() {
            return None;
        }
        start -= 1;
    }

    let mut end = start + 1;
    while end < lines.len()
        && matches!(
            lines[end].kind,
            ElementKind::Parenthetical | ElementKind::Dialogue
        )
    {
        end += 1;
    }

    lines[start..end]
        .iter()
        .any(|line| line.kind == ElementKind::Dialogue)
        .then_some(DialogueBlock {
            page: pos.page,
            start,
            end,
        })
}

/// Next block on the page, skipping blank action lines; must start at a cue
fn next_block(doc: &Document, block: &DialogueBlock) -> Option<DialogueBlock> {
    let lines = doc.page(block.page)?.lines();
    let cursor = (block.end..lines.len()).find(|&i| !lines[i].is_blank_action())?;
    if lines[cursor].kind != ElementKind::Character {
        return None;
    }
    block_at(doc, LinePos::new(block.page, cursor))
}

/// Previous block on the page, skipping blank action lines only
fn prev_block(doc: &Document, block: &DialogueBlock) -> Option<DialogueBlock> {
    let lines = doc.page(block.page)?.lines();
    let cursor = (0..block.start).rev().find(|&i| !lines[i].is_blank_action())?;
    block_at(doc, LinePos::new(block.page, cursor))
}

/// Exactly two distinct blocks touched by a selection within one page
pub fn selected_blocks(doc: &Document, selection: &Selection) -> Option<(DialogueBlock, DialogueBlock)> {
    if selection.is_collapsed() {
        return None;
    }
    let (start, end) = selection.ordered(doc)?;
    if start.pos.page != end.pos.page {
        return None;
    }

    let mut blocks = BTreeMap::new();
    for index in start.pos.index..=end.pos.index {
        if let Some(block) = block_at(doc, LinePos::new(start.pos.page, index)) {
            blocks.insert(block.start, block);
            if blocks.len() > 2 {
                return None;
            }
        }
    }

    let mut blocks = blocks.into_values();
    match (blocks.next(), blocks.next()) {
        (Some(left), Some(right)) => Some((left, right)),
        _ => None,
    }
}

/// Toggle dual dialogue for a multi-block selection, or else at the caret
pub fn toggle_dual_dialogue(doc: &mut Document, selection: &Selection) -> DualToggle {
    if let Some((left, right)) = selected_blocks(doc, selection) {
        let left_group = left.group(doc);
        let right_group = right.group(doc);

        if let (Some(a), Some(b)) = (left_group, right_group) {
            if a == b {
                doc.clear_dual_group(a, Some(left.page));
                return DualToggle::Unpaired(a);
            }
        }

        return DualToggle::Paired(pair(doc, left, right));
    }

    let Some(caret) = resolve(doc, selection.caret()) else {
        return DualToggle::NotInDialogue;
    };

    if let Some(tag) = doc.line(caret.pos).and_then(|line| line.dual) {
        doc.clear_dual_group(tag.group, Some(caret.pos.page));
        return DualToggle::Unpaired(tag.group);
    }

    let Some(current) = block_at(doc, caret.pos) else {
        return DualToggle::NotInDialogue;
    };

    let pair_blocks = match next_block(doc, &current) {
        Some(next) => Some((current, next)),
        None => prev_block(doc, &current).map(|prev| (prev, current)),
    };

    match pair_blocks {
        Some((left, right)) => DualToggle::Paired(pair(doc, left, right)),
        None => DualToggle::NoPartner,
    }
}

fn pair(doc: &mut Document, left: DialogueBlock, mut right: DialogueBlock) -> DualGroupId {
    let page = left.page;

    for group in [left.group(doc), right.group(doc)].into_iter().flatten() {
        doc.clear_dual_group(group, Some(page));
    }

    let mut removed = 0;
    for index in (left.end..right.start).rev() {
        let pos = LinePos::new(page, index);
        if doc.line(pos).is_some_and(|line| line.is_blank_action()) {
            doc.remove_line(pos);
            removed += 1;
        }
    }
    right.start -= removed;
    right.end -= removed;

    let group = doc.allocate_group();
    tag_block(doc, &left, group, DualSide::Left);
    tag_block(doc, &right, group, DualSide::Right);

    debug!(%group, page, removed, "paired dual dialogue");
    group
}

fn tag_block(doc: &mut Document, block: &DialogueBlock, group: DualGroupId, side: DualSide) {
    for index in block.range() {
        if let Some(line) = doc.line_mut(LinePos::new(block.page, index)) {
            line.dual = Some(DualTag { group, side });
        }
    }
}

/// Clear groups on a page whose lines no longer all sit in dialogue kinds.
///
/// Returns the number of lines untagged.
pub fn clear_stale_groups(doc: &mut Document, page: usize) -> usize {
    let Some(lines) = doc.page(page).map(|p| p.lines()) else {
        return 0;
    };

    let mut stale: Vec<DualGroupId> = lines
        .iter()
        .filter(|line| !line.kind.is_dialogueish())
        .filter_map(|line| line.dual.map(|tag| tag.group))
        .collect();
    stale.sort();
    stale.dedup();

    stale
        .into_iter()
        .map(|group| doc.clear_dual_group(group, Some(page)))
        .sum()
}
