//! # Pagination Engine
//!
//! Re-flows the page store after every content-mutating operation.
//!
//! Pages are visited once, in document order. While a page overflows, its
//! trailing line group is moved to the top of the next page (created on
//! demand). Moves may make the next page overflow, which is handled when the
//! sweep reaches it. Nothing is ever pulled back to an earlier page.
//!
//! Move groups:
//! - a single line by default
//! - `parenthetical, dialogue` (plus the `character` above) when the page ends
//!   in dialogue, so a cue is never orphaned from its first parenthetical
//! - `scene-heading, action` when the page ends in action under a heading
//!
//! When dialogue moves without its cue, the next page gets a
//! `NAME (CONT'D)` header. A group that is the whole page cannot move
//! anywhere useful and is accepted as overflow.

use crate::elements::{contd_header, is_contd_header, strip_contd};
use crate::metrics::OverflowOracle;
use crate::settings::Settings;
use serde::Serialize;
use slugline_parser::{Document, ElementKind, Line, LinePos, Page, Placement};
use tracing::{debug, instrument, warn};

/// What a pagination pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationReport {
    pub moved_lines: usize,
    pub continuations: usize,
    pub headers_removed: usize,
    pub pages_created: usize,
    pub pages_removed: usize,

    /// Pages left overflowing because nothing could be moved off them
    pub accepted_overflow: Vec<usize>,
}

impl PaginationReport {
    pub fn changed(&self) -> bool {
        self.moved_lines > 0
            || self.continuations > 0
            || self.headers_removed > 0
            || self.pages_created > 0
            || self.pages_removed > 0
    }
}

/// Trailing lines of a page that move together
#[derive(Debug, Clone, PartialEq, Eq)]
struct MoveGroup {
    start: usize,
    end: usize,
    continuation: Option<String>,
}

/// Rebalance every page, prune empty pages and refresh page-number labels
#[instrument(skip_all, fields(pages = doc.page_count()))]
pub fn paginate<O>(doc: &mut Document, oracle: &O, settings: &Settings) -> PaginationReport
where
    O: OverflowOracle + ?Sized,
{
    let mut report = PaginationReport::default();

    let mut index = 0;
    while index < doc.page_count() {
        rebalance_page(doc, index, oracle, &mut report);
        index += 1;
    }

    report.pages_removed = doc.remove_empty_trailing_pages();
    update_page_labels(doc, settings);

    if report.changed() {
        debug!(
            moved = report.moved_lines,
            continuations = report.continuations,
            created = report.pages_created,
            removed = report.pages_removed,
            "pagination pass"
        );
    }

    report
}

fn rebalance_page<O>(doc: &mut Document, index: usize, oracle: &O, report: &mut PaginationReport)
where
    O: OverflowOracle + ?Sized,
{
    loop {
        let Some(page) = doc.page(index) else {
            return;
        };
        if !oracle.overflows(page) {
            return;
        }
        let Some(group) = move_group(page) else {
            return;
        };

        if fills_page(page, &group) {
            warn!(
                page = index,
                lines = page.len(),
                "page overflows with nothing left to move, accepting overflow"
            );
            report.accepted_overflow.push(index);
            return;
        }

        let next = if index + 1 < doc.page_count() {
            index + 1
        } else {
            report.pages_created += 1;
            doc.create_page(Some(index))
        };

        place_group(doc, index, next, group, report);
    }
}

/// True when moving `group` would leave nothing behind but the speaker's own
/// continuation header, which would just be synthesized again on the next page
fn fills_page(page: &Page, group: &MoveGroup) -> bool {
    let above = &page.lines()[..group.start];
    match &group.continuation {
        Some(base) => above
            .iter()
            .all(|line| is_contd_header(line) && same_speaker(line, base)),
        None => above.is_empty(),
    }
}

fn move_group(page: &Page) -> Option<MoveGroup> {
    let lines = page.lines();
    let last = lines.len().checked_sub(1)?;
    let kind = |i: usize| lines[i].kind;

    let mut start = last;
    match kind(last) {
        ElementKind::Dialogue => {
            if last >= 1 && kind(last - 1) == ElementKind::Parenthetical {
                start = last - 1;
                if start >= 1 && kind(start - 1) == ElementKind::Character {
                    start -= 1;
                }
            }
        }
        ElementKind::Action => {
            if last >= 1 && kind(last - 1) == ElementKind::SceneHeading {
                start = last - 1;
            }
        }
        _ => {}
    }

    let continuation = if kind(last) == ElementKind::Dialogue && kind(start) != ElementKind::Character {
        continuation_name(&lines[..start])
    } else {
        None
    };

    Some(MoveGroup {
        start,
        end: lines.len(),
        continuation,
    })
}

/// Speaker of dialogue that continues past the end of `above`
fn continuation_name(above: &[Line]) -> Option<String> {
    above
        .iter()
        .rev()
        .find(|line| line.kind == ElementKind::Character)
        .map(|line| strip_contd(&line.text))
        .filter(|base| !base.is_empty())
}

fn same_speaker(line: &Line, base: &str) -> bool {
    line.kind == ElementKind::Character && strip_contd(&line.text) == base
}

fn place_group(doc: &mut Document, from: usize, to: usize, group: MoveGroup, report: &mut PaginationReport) {
    let moving_cue = doc
        .line(LinePos::new(from, group.start))
        .filter(|line| line.kind == ElementKind::Character)
        .map(|line| strip_contd(&line.text));

    // The speaker's own cue is arriving, so a continuation header for it is stale
    if let Some(base) = moving_cue {
        let redundant = doc
            .page(to)
            .and_then(Page::first)
            .is_some_and(|first| is_contd_header(first) && same_speaker(first, &base));
        if redundant {
            doc.remove_line(LinePos::new(to, 0));
            report.headers_removed += 1;
            debug!(page = to, speaker = %base, "removed redundant continuation header");
        }
    }

    let placement = match &group.continuation {
        Some(base) => {
            let has_header = doc
                .page(to)
                .and_then(Page::first)
                .is_some_and(|first| same_speaker(first, base));
            if !has_header {
                let header = Line::new(ElementKind::Character, contd_header(base));
                doc.insert_line(LinePos::new(to, 0), header);
                report.continuations += 1;
                debug!(page = to, speaker = %base, "synthesized continuation header");
            }
            Placement::Index(1)
        }
        None => Placement::Start,
    };

    report.moved_lines += doc.move_lines(from, group.start..group.end, to, placement);
}

/// Display number of a page: `"<n>."`, or empty on page 1 when numbering
/// starts on page 2
pub fn page_label(index: usize, settings: &Settings) -> String {
    if index == 0 && settings.page_numbers_start_on_page2 {
        String::new()
    } else {
        format!("{}.", index + 1)
    }
}

pub fn update_page_labels(doc: &mut Document, settings: &Settings) {
    for index in 0..doc.page_count() {
        doc.set_page_label(index, page_label(index, settings));
    }
}
