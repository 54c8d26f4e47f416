//! Print layout projection.
//!
//! Builds a read-only view of the document for printing and export: display
//! casing applied, page labels and headers resolved, and consecutive lines of a
//! dual-dialogue group folded into a two-column item. The document itself is
//! never rearranged.

use crate::pagination::page_label;
use crate::settings::{PrintHeaderStyle, Settings};
use serde::Serialize;
use slugline_parser::{Document, DualGroupId, DualSide, ElementKind, Line, Page, TitlePage};
use std::fmt::Write as _;

pub const DRAFT_WATERMARK: &str = "DRAFT";

/// Width of one dual-dialogue column in the text rendering
const DUAL_COLUMN_WIDTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintLine {
    pub kind: ElementKind,
    pub text: String,
}

impl From<&Line> for PrintLine {
    fn from(line: &Line) -> Self {
        Self {
            kind: line.kind,
            text: line.display_text().into_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PrintItem {
    Line(PrintLine),
    Dual {
        group: DualGroupId,
        left: Vec<PrintLine>,
        right: Vec<PrintLine>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintPage {
    pub number: String,
    pub header: Option<String>,
    pub watermark: Option<String>,
    pub items: Vec<PrintItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintLayout {
    pub title_page: Option<TitlePage>,
    pub pages: Vec<PrintPage>,
}

impl PrintLayout {
    pub fn build(doc: &Document, metadata: &TitlePage, settings: &Settings) -> Self {
        let title = metadata.title.trim();
        let header = (settings.print_header_style == PrintHeaderStyle::Title && !title.is_empty())
            .then(|| title.to_string());
        let watermark = settings
            .print_watermark_draft
            .then(|| DRAFT_WATERMARK.to_string());

        let pages = doc
            .pages()
            .iter()
            .enumerate()
            .map(|(index, page)| PrintPage {
                number: if settings.show_page_numbers_in_print {
                    page_label(index, settings)
                } else {
                    String::new()
                },
                header: header.clone(),
                watermark: watermark.clone(),
                items: fold_items(page),
            })
            .collect();

        let title_page = (settings.include_title_page_in_print && has_title_content(metadata))
            .then(|| metadata.clone());

        Self { title_page, pages }
    }

    /// Number of two-column items across all pages
    pub fn dual_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|page| &page.items)
            .filter(|item| matches!(item, PrintItem::Dual { .. }))
            .count()
    }

    /// Monospace text rendering, pages separated by form feeds
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        if let Some(title_page) = &self.title_page {
            render_title_page(&mut out, title_page);
            out.push('\u{c}');
        }

        for (index, page) in self.pages.iter().enumerate() {
            if index > 0 {
                out.push('\u{c}');
            }
            if let Some(header) = &page.header {
                let _ = writeln!(out, "{}", header);
            }
            if !page.number.is_empty() {
                let _ = writeln!(out, "{:>61}", page.number);
            }
            if let Some(watermark) = &page.watermark {
                let _ = writeln!(out, "{:^61}", watermark);
            }
            if page.header.is_some() || !page.number.is_empty() || page.watermark.is_some() {
                out.push('\n');
            }

            for item in &page.items {
                match item {
                    PrintItem::Line(line) => render_line(&mut out, line),
                    PrintItem::Dual { left, right, .. } => render_dual(&mut out, left, right),
                }
            }
        }

        out
    }
}

fn has_title_content(metadata: &TitlePage) -> bool {
    [
        &metadata.title,
        &metadata.tagline,
        &metadata.author,
        &metadata.contact,
        &metadata.date,
        &metadata.rights,
    ]
    .iter()
    .any(|field| !field.trim().is_empty())
}

/// Fold consecutive lines of one dual group into a single item
fn fold_items(page: &Page) -> Vec<PrintItem> {
    let lines = page.lines();
    let mut items = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        let Some(tag) = lines[index].dual else {
            items.push(PrintItem::Line(PrintLine::from(&lines[index])));
            index += 1;
            continue;
        };

        let mut left = Vec::new();
        let mut right = Vec::new();
        while let Some(line) = lines.get(index).filter(|l| l.dual.is_some_and(|t| t.group == tag.group)) {
            match line.dual.map(|t| t.side) {
                Some(DualSide::Right) => right.push(PrintLine::from(line)),
                _ => left.push(PrintLine::from(line)),
            }
            index += 1;
        }

        items.push(PrintItem::Dual {
            group: tag.group,
            left,
            right,
        });
    }

    items
}

fn indent(kind: ElementKind) -> usize {
    match kind {
        ElementKind::Character => 20,
        ElementKind::Parenthetical => 15,
        ElementKind::Dialogue => 10,
        ElementKind::Transition => 45,
        ElementKind::SceneHeading | ElementKind::Action | ElementKind::FadeIn => 0,
    }
}

fn render_line(out: &mut String, line: &PrintLine) {
    if line.text.is_empty() {
        out.push('\n');
    } else {
        let _ = writeln!(out, "{}{}", " ".repeat(indent(line.kind)), line.text);
    }
}

/// Cue lines are centred in their column, everything else left-aligned
fn dual_cell(line: Option<&PrintLine>) -> String {
    match line {
        Some(line) if line.kind == ElementKind::Character => {
            format!("{:^width$}", line.text, width = DUAL_COLUMN_WIDTH)
        }
        Some(line) => format!("{:<width$}", line.text, width = DUAL_COLUMN_WIDTH),
        None => " ".repeat(DUAL_COLUMN_WIDTH),
    }
}

fn render_dual(out: &mut String, left: &[PrintLine], right: &[PrintLine]) {
    let rows = left.len().max(right.len());
    for row in 0..rows {
        let line = format!("{} {}", dual_cell(left.get(row)), dual_cell(right.get(row)));
        let _ = writeln!(out, "{}", line.trim_end());
    }
}

fn render_title_page(out: &mut String, title_page: &TitlePage) {
    for field in [&title_page.title, &title_page.tagline] {
        if !field.trim().is_empty() {
            let _ = writeln!(out, "{:^61}", field.trim());
        }
    }
    if !title_page.author.trim().is_empty() {
        let _ = writeln!(out, "\n{:^61}\n{:^61}", "written by", title_page.author.trim());
    }
    for field in [&title_page.contact, &title_page.date, &title_page.rights] {
        if !field.trim().is_empty() {
            let _ = writeln!(out, "{}", field.trim());
        }
    }
}
