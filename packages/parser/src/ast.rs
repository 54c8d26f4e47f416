use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::ParseError;

/// Screenplay role of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    SceneHeading,
    #[default]
    Action,
    Character,
    Parenthetical,
    Dialogue,
    Transition,
    FadeIn,
}

impl ElementKind {
    pub const ALL: [ElementKind; 7] = [
        ElementKind::SceneHeading,
        ElementKind::Action,
        ElementKind::Character,
        ElementKind::Parenthetical,
        ElementKind::Dialogue,
        ElementKind::Transition,
        ElementKind::FadeIn,
    ];

    /// Stable kebab-case name (also the serialized form)
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::SceneHeading => "scene-heading",
            ElementKind::Action => "action",
            ElementKind::Character => "character",
            ElementKind::Parenthetical => "parenthetical",
            ElementKind::Dialogue => "dialogue",
            ElementKind::Transition => "transition",
            ElementKind::FadeIn => "fade-in",
        }
    }

    /// Human readable name for the current-element indicator
    pub fn display_name(&self) -> &'static str {
        match self {
            ElementKind::SceneHeading => "Scene Heading",
            ElementKind::Action => "Action",
            ElementKind::Character => "Character",
            ElementKind::Parenthetical => "Parenthetical",
            ElementKind::Dialogue => "Dialogue",
            ElementKind::Transition => "Transition",
            ElementKind::FadeIn => "Fade In",
        }
    }

    /// Kinds displayed (and exported) in upper case
    pub fn is_uppercase(&self) -> bool {
        matches!(
            self,
            ElementKind::SceneHeading
                | ElementKind::Character
                | ElementKind::Transition
                | ElementKind::FadeIn
        )
    }

    /// Kinds that can be part of a dialogue block
    pub fn is_dialogueish(&self) -> bool {
        matches!(
            self,
            ElementKind::Character | ElementKind::Parenthetical | ElementKind::Dialogue
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let name = name.strip_prefix("el-").unwrap_or(&name);
        ElementKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| ParseError::malformed(format!("unknown element kind '{}'", s)))
    }
}

/// Identity of a line, stable across page moves and re-classification.
///
/// Identities are session-local and never persisted. `LineId(0)` marks a
/// line that has not been adopted by a [`Document`] yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u64);

impl LineId {
    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

/// Identifier shared by the two halves of a dual-dialogue pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DualGroupId(pub u64);

impl fmt::Display for DualGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dual_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DualSide {
    Left,
    Right,
}

/// Dual-dialogue membership of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DualTag {
    pub group: DualGroupId,
    pub side: DualSide,
}

/// A single screenplay line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(skip)]
    pub id: LineId,
    pub kind: ElementKind,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual: Option<DualTag>,
}

impl Line {
    pub fn new(kind: ElementKind, text: impl Into<String>) -> Self {
        Self {
            id: LineId::default(),
            kind,
            text: text.into(),
            dual: None,
        }
    }

    pub fn blank(kind: ElementKind) -> Self {
        Self::new(kind, String::new())
    }

    /// Whitespace-only lines render as an empty line
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn is_blank_action(&self) -> bool {
        self.kind == ElementKind::Action && self.is_blank()
    }

    /// Length in chars; caret offsets are measured in the same unit
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Text as displayed, with the casing rules of the line's kind applied
    pub fn display_text(&self) -> Cow<'_, str> {
        if self.kind.is_uppercase() {
            Cow::Owned(self.text.to_uppercase())
        } else {
            Cow::Borrowed(&self.text)
        }
    }
}

/// Free-form title page metadata, owned independently of the paginated body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitlePage {
    pub title: String,
    pub tagline: String,
    pub author: String,
    pub contact: String,
    pub date: String,
    pub rights: String,
}

/// One physical page of the screenplay body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    lines: Vec<Line>,

    /// Derived display number ("2.", or empty when suppressed)
    #[serde(skip)]
    number_label: String,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self {
            lines,
            number_label: String::new(),
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn first(&self) -> Option<&Line> {
        self.lines.first()
    }

    pub fn last(&self) -> Option<&Line> {
        self.lines.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    /// True when every line on the page is blank
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(Line::is_blank)
    }

    pub fn number_label(&self) -> &str {
        &self.number_label
    }

    pub fn set_number_label(&mut self, label: impl Into<String>) {
        self.number_label = label.into();
    }
}

/// Position of a line: page index and index within that page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinePos {
    pub page: usize,
    pub index: usize,
}

impl LinePos {
    pub fn new(page: usize, index: usize) -> Self {
        Self { page, index }
    }
}

/// Where moved lines land on the target page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Start,
    End,
    Index(usize),
}

/// The paginated screenplay body.
///
/// Invariants:
/// - there is always at least one page
/// - every line belongs to exactly one page and carries a unique [`LineId`]
/// - the first page is never removed automatically, even when empty
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pages: Vec<Page>,
    next_line_id: u64,
    next_group_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document with a single empty page
    pub fn new() -> Self {
        Self {
            pages: vec![Page::new()],
            next_line_id: 1,
            next_group_id: 1,
        }
    }

    /// Build a document from loaded pages, assigning fresh line identities
    pub fn from_pages(pages: Vec<Page>) -> Self {
        let mut doc = Self {
            pages: Vec::with_capacity(pages.len().max(1)),
            next_line_id: 1,
            next_group_id: 1,
        };

        for page in pages {
            let mut fresh = Page::new();
            for mut line in page.lines {
                line.id = LineId::default();
                let line = doc.adopt(line);
                fresh.lines.push(line);
            }
            doc.pages.push(fresh);
        }

        if doc.pages.is_empty() {
            doc.pages.push(Page::new());
        }

        doc.next_group_id = doc.max_group_id().map_or(1, |g| g + 1);
        doc
    }

    /// Replace all pages while keeping existing line identities (history restore)
    pub fn restore_pages(&mut self, pages: Vec<Page>) {
        self.pages = pages;
        if self.pages.is_empty() {
            self.pages.push(Page::new());
        }

        let mut max_line = 0;
        for page in &mut self.pages {
            for line in &mut page.lines {
                if !line.id.is_assigned() {
                    line.id = LineId(self.next_line_id);
                    self.next_line_id += 1;
                }
                max_line = max_line.max(line.id.0);
            }
        }
        self.next_line_id = self.next_line_id.max(max_line + 1);

        if let Some(max_group) = self.max_group_id() {
            self.next_group_id = self.next_group_id.max(max_group + 1);
        }
    }

    fn max_group_id(&self) -> Option<u64> {
        self.lines()
            .filter_map(|line| line.dual.map(|tag| tag.group.0))
            .max()
    }

    /// Give a line an identity if it doesn't have one yet
    fn adopt(&mut self, mut line: Line) -> Line {
        if line.id.is_assigned() {
            self.next_line_id = self.next_line_id.max(line.id.0 + 1);
        } else {
            line.id = LineId(self.next_line_id);
            self.next_line_id += 1;
        }
        line
    }

    /// Create a new line with a fresh identity (not yet placed on a page)
    pub fn new_line(&mut self, kind: ElementKind, text: impl Into<String>) -> Line {
        self.adopt(Line::new(kind, text))
    }

    /// Allocate a dual-dialogue group id that is not used anywhere in the document
    pub fn allocate_group(&mut self) -> DualGroupId {
        let id = DualGroupId(self.next_group_id);
        self.next_group_id += 1;
        id
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    /// All lines in document order
    pub fn lines(&self) -> impl Iterator<Item = &Line> + '_ {
        self.pages.iter().flat_map(|page| page.lines.iter())
    }

    /// All lines in document order, with their positions
    pub fn positions(&self) -> impl Iterator<Item = (LinePos, &Line)> + '_ {
        self.pages.iter().enumerate().flat_map(|(page_index, page)| {
            page.lines
                .iter()
                .enumerate()
                .map(move |(index, line)| (LinePos::new(page_index, index), line))
        })
    }

    pub fn line(&self, pos: LinePos) -> Option<&Line> {
        self.pages.get(pos.page)?.lines.get(pos.index)
    }

    /// Mutable access to a line's kind, text and tags.
    ///
    /// Callers must not overwrite `id`.
    pub fn line_mut(&mut self, pos: LinePos) -> Option<&mut Line> {
        self.pages.get_mut(pos.page)?.lines.get_mut(pos.index)
    }

    pub fn locate(&self, id: LineId) -> Option<LinePos> {
        self.positions()
            .find(|(_, line)| line.id == id)
            .map(|(pos, _)| pos)
    }

    pub fn line_by_id(&self, id: LineId) -> Option<&Line> {
        self.lines().find(|line| line.id == id)
    }

    /// Previous line in document order, crossing page boundaries
    pub fn prev_pos(&self, pos: LinePos) -> Option<LinePos> {
        if pos.index > 0 && pos.page < self.pages.len() {
            return Some(LinePos::new(pos.page, pos.index - 1));
        }
        (0..pos.page.min(self.pages.len()))
            .rev()
            .find(|&p| !self.pages[p].is_empty())
            .map(|p| LinePos::new(p, self.pages[p].len() - 1))
    }

    /// Next line in document order, crossing page boundaries
    pub fn next_pos(&self, pos: LinePos) -> Option<LinePos> {
        let page = self.pages.get(pos.page)?;
        if pos.index + 1 < page.len() {
            return Some(LinePos::new(pos.page, pos.index + 1));
        }
        (pos.page + 1..self.pages.len())
            .find(|&p| !self.pages[p].is_empty())
            .map(|p| LinePos::new(p, 0))
    }

    /// Insert a line; the index is clamped to the page length
    pub fn insert_line(&mut self, pos: LinePos, line: Line) -> Option<LinePos> {
        if pos.page >= self.pages.len() {
            return None;
        }
        let line = self.adopt(line);
        let page = &mut self.pages[pos.page];
        let index = pos.index.min(page.lines.len());
        page.lines.insert(index, line);
        Some(LinePos::new(pos.page, index))
    }

    pub fn push_line(&mut self, page: usize, line: Line) -> Option<LinePos> {
        let index = self.pages.get(page)?.len();
        self.insert_line(LinePos::new(page, index), line)
    }

    pub fn remove_line(&mut self, pos: LinePos) -> Option<Line> {
        let page = self.pages.get_mut(pos.page)?;
        if pos.index < page.lines.len() {
            Some(page.lines.remove(pos.index))
        } else {
            None
        }
    }

    /// Insert a new empty page after `after` (or append), returning its index
    pub fn create_page(&mut self, after: Option<usize>) -> usize {
        match after {
            Some(index) if index < self.pages.len() => {
                self.pages.insert(index + 1, Page::new());
                index + 1
            }
            _ => {
                self.pages.push(Page::new());
                self.pages.len() - 1
            }
        }
    }

    /// Remove a page; the last remaining page can never be removed
    pub fn remove_page(&mut self, index: usize) -> Option<Page> {
        if self.pages.len() <= 1 || index >= self.pages.len() {
            return None;
        }
        Some(self.pages.remove(index))
    }

    /// Delete every page beyond the first that has no lines
    pub fn remove_empty_trailing_pages(&mut self) -> usize {
        let before = self.pages.len();
        let mut index = 0;
        self.pages.retain(|page| {
            let keep = index == 0 || !page.is_empty();
            index += 1;
            keep
        });
        before - self.pages.len()
    }

    /// Move a run of lines between pages, preserving identity and dual tags.
    ///
    /// Returns the number of lines moved; invalid pages or an empty range move
    /// nothing.
    pub fn move_lines(
        &mut self,
        from: usize,
        range: Range<usize>,
        to: usize,
        placement: Placement,
    ) -> usize {
        if from == to || from >= self.pages.len() || to >= self.pages.len() {
            return 0;
        }

        let len = self.pages[from].lines.len();
        let start = range.start.min(len);
        let end = range.end.min(len);
        if start >= end {
            return 0;
        }

        let moved: Vec<Line> = self.pages[from].lines.drain(start..end).collect();
        let count = moved.len();

        let target = &mut self.pages[to].lines;
        let at = match placement {
            Placement::Start => 0,
            Placement::End => target.len(),
            Placement::Index(index) => index.min(target.len()),
        };
        target.splice(at..at, moved);

        count
    }

    /// Clear a dual group's tags, on one page or across the whole document
    pub fn clear_dual_group(&mut self, group: DualGroupId, page: Option<usize>) -> usize {
        let mut cleared = 0;
        for (index, p) in self.pages.iter_mut().enumerate() {
            if page.is_some_and(|only| only != index) {
                continue;
            }
            for line in &mut p.lines {
                if line.dual.is_some_and(|tag| tag.group == group) {
                    line.dual = None;
                    cleared += 1;
                }
            }
        }
        cleared
    }

    pub fn set_page_label(&mut self, index: usize, label: impl Into<String>) {
        if let Some(page) = self.pages.get_mut(index) {
            page.set_number_label(label);
        }
    }

    /// Clone of the pages, with identities, for snapshots
    pub fn snapshot_pages(&self) -> Vec<Page> {
        self.pages.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(lines: &[(ElementKind, &str)]) -> Document {
        let page = Page::from_lines(
            lines
                .iter()
                .map(|(kind, text)| Line::new(*kind, *text))
                .collect(),
        );
        Document::from_pages(vec![page])
    }

    #[test]
    fn test_element_kind_names_round_trip() {
        for kind in ElementKind::ALL {
            assert_eq!(kind.as_str().parse::<ElementKind>().unwrap(), kind);
        }
        assert_eq!("el-scene-heading".parse::<ElementKind>().unwrap(), ElementKind::SceneHeading);
        assert!("montage".parse::<ElementKind>().is_err());
    }

    #[test]
    fn test_from_pages_assigns_unique_ids() {
        let doc = doc_with(&[
            (ElementKind::SceneHeading, "INT. HOUSE - DAY"),
            (ElementKind::Action, "Rain."),
        ]);
        let ids: Vec<LineId> = doc.lines().map(|l| l.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.iter().all(LineId::is_assigned));
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_empty_document_keeps_first_page() {
        let mut doc = Document::from_pages(vec![]);
        assert_eq!(doc.page_count(), 1);
        assert!(doc.remove_page(0).is_none());
        assert_eq!(doc.remove_empty_trailing_pages(), 0);
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_remove_empty_trailing_pages() {
        let mut doc = doc_with(&[(ElementKind::Action, "One")]);
        doc.create_page(None);
        let third = doc.create_page(None);
        doc.push_line(third, Line::new(ElementKind::Action, "Three"));
        doc.create_page(None);

        assert_eq!(doc.page_count(), 4);
        assert_eq!(doc.remove_empty_trailing_pages(), 2);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages()[1].lines()[0].text, "Three");
    }

    #[test]
    fn test_create_page_after() {
        let mut doc = doc_with(&[(ElementKind::Action, "One")]);
        doc.create_page(None);
        let inserted = doc.create_page(Some(0));
        assert_eq!(inserted, 1);
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_move_lines_preserves_identity_and_tags() {
        let mut doc = doc_with(&[
            (ElementKind::Character, "BOB"),
            (ElementKind::Dialogue, "Hi."),
            (ElementKind::Action, "He leaves."),
        ]);
        let group = doc.allocate_group();
        doc.line_mut(LinePos::new(0, 1)).unwrap().dual = Some(DualTag {
            group,
            side: DualSide::Left,
        });
        let id = doc.line(LinePos::new(0, 1)).unwrap().id;

        let next = doc.create_page(Some(0));
        doc.push_line(next, Line::new(ElementKind::Action, "Later."));

        let moved = doc.move_lines(0, 1..3, next, Placement::Start);
        assert_eq!(moved, 2);
        assert_eq!(doc.pages()[0].len(), 1);
        assert_eq!(doc.locate(id), Some(LinePos::new(1, 0)));
        assert_eq!(doc.line_by_id(id).unwrap().dual.unwrap().group, group);
        assert_eq!(doc.pages()[1].lines()[2].text, "Later.");
    }

    #[test]
    fn test_move_lines_rejects_same_page() {
        let mut doc = doc_with(&[(ElementKind::Action, "One")]);
        assert_eq!(doc.move_lines(0, 0..1, 0, Placement::End), 0);
    }

    #[test]
    fn test_prev_and_next_cross_pages() {
        let mut doc = doc_with(&[(ElementKind::Action, "One")]);
        doc.create_page(None);
        let third = doc.create_page(None);
        doc.push_line(third, Line::new(ElementKind::Action, "Three"));

        let first = LinePos::new(0, 0);
        let last = LinePos::new(2, 0);
        assert_eq!(doc.next_pos(first), Some(last));
        assert_eq!(doc.prev_pos(last), Some(first));
        assert_eq!(doc.prev_pos(first), None);
    }

    #[test]
    fn test_restore_pages_keeps_counters_ahead() {
        let mut doc = doc_with(&[(ElementKind::Action, "One")]);
        let pages = doc.snapshot_pages();
        let extra = doc.new_line(ElementKind::Action, "Two");
        doc.restore_pages(pages);
        let fresh = doc.new_line(ElementKind::Action, "Three");
        assert!(fresh.id > extra.id);
    }

    #[test]
    fn test_display_text_casing() {
        assert_eq!(Line::new(ElementKind::Character, "bob").display_text(), "BOB");
        assert_eq!(Line::new(ElementKind::Dialogue, "hi").display_text(), "hi");
    }
}
