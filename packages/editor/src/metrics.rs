//! Overflow oracles.
//!
//! The pagination engine never measures anything itself; it asks an
//! [`OverflowOracle`] whether a page exceeds its physical capacity. The browser
//! host measures rendered height. [`LineBudget`] is the reference oracle used
//! by the CLI and the wasm surface: it estimates rows from per-kind column
//! widths of a Courier 12pt page.

use crate::settings::{MarginPreset, Settings};
use slugline_parser::{ElementKind, Line, Page};

/// "Does this page overflow its physical capacity?"
pub trait OverflowOracle {
    fn overflows(&self, page: &Page) -> bool;
}

impl<F> OverflowOracle for F
where
    F: Fn(&Page) -> bool,
{
    fn overflows(&self, page: &Page) -> bool {
        self(page)
    }
}

pub const DEFAULT_LINES_PER_PAGE: usize = 55;

/// Columns by which the narrow/wide presets widen/narrow full-width kinds
const MARGIN_ADJUST: usize = 3;

/// Row-count estimate of a page against a fixed budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBudget {
    pub lines_per_page: usize,
    pub margin: MarginPreset,
}

impl Default for LineBudget {
    fn default() -> Self {
        Self::new(DEFAULT_LINES_PER_PAGE)
    }
}

impl LineBudget {
    pub fn new(lines_per_page: usize) -> Self {
        Self {
            lines_per_page: lines_per_page.max(1),
            margin: MarginPreset::Standard,
        }
    }

    pub fn from_settings(settings: &Settings, lines_per_page: usize) -> Self {
        Self::new(lines_per_page).with_margin(settings.margin_preset)
    }

    pub fn with_margin(mut self, margin: MarginPreset) -> Self {
        self.margin = margin;
        self
    }

    /// Text columns available to a kind
    pub fn columns(&self, kind: ElementKind) -> usize {
        let base = match kind {
            ElementKind::Character => 38,
            ElementKind::Dialogue => 35,
            ElementKind::Parenthetical => 26,
            ElementKind::Action
            | ElementKind::SceneHeading
            | ElementKind::Transition
            | ElementKind::FadeIn => 61,
        };

        if base != 61 {
            return base;
        }
        match self.margin {
            MarginPreset::Standard => base,
            MarginPreset::Narrow => base + MARGIN_ADJUST,
            MarginPreset::Wide => base - MARGIN_ADJUST,
        }
    }

    /// Rendered rows of a line; blank lines still take one row
    pub fn rows(&self, line: &Line) -> usize {
        let columns = self.columns(line.kind);
        line.char_len().div_ceil(columns).max(1)
    }

    pub fn page_rows(&self, page: &Page) -> usize {
        page.iter().map(|line| self.rows(line)).sum()
    }
}

impl OverflowOracle for LineBudget {
    fn overflows(&self, page: &Page) -> bool {
        self.page_rows(page) > self.lines_per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_wrap_by_kind_width() {
        let budget = LineBudget::default();
        assert_eq!(budget.rows(&Line::blank(ElementKind::Action)), 1);
        assert_eq!(budget.rows(&Line::new(ElementKind::Action, "a".repeat(61))), 1);
        assert_eq!(budget.rows(&Line::new(ElementKind::Action, "a".repeat(62))), 2);
        assert_eq!(budget.rows(&Line::new(ElementKind::Dialogue, "a".repeat(36))), 2);
    }

    #[test]
    fn test_margin_presets_adjust_full_width_kinds() {
        let wide = LineBudget::default().with_margin(MarginPreset::Wide);
        let narrow = LineBudget::default().with_margin(MarginPreset::Narrow);
        assert_eq!(wide.columns(ElementKind::Action), 58);
        assert_eq!(narrow.columns(ElementKind::SceneHeading), 64);
        assert_eq!(wide.columns(ElementKind::Dialogue), 35);
    }

    #[test]
    fn test_overflow_threshold() {
        let budget = LineBudget::new(2);
        let fits = Page::from_lines(vec![Line::blank(ElementKind::Action); 2]);
        let over = Page::from_lines(vec![Line::blank(ElementKind::Action); 3]);
        assert!(!budget.overflows(&fits));
        assert!(budget.overflows(&over));
    }

    #[test]
    fn test_closure_oracle() {
        let oracle = |page: &Page| page.len() > 1;
        assert!(!oracle.overflows(&Page::new()));
    }
}
