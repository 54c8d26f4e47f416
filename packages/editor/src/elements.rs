//! # Element State Model
//!
//! Ordering rules between element kinds (what comes next on Enter, Tab cycle
//! order, smart defaults for blank lines) and re-classification of a line
//! with caret-offset preservation.

use crate::settings::Settings;
use once_cell::sync::Lazy;
use regex::Regex;
use slugline_parser::classifier::is_wrapped_in_parens;
use slugline_parser::{Document, ElementKind, Line, LinePos};

/// Tab cycle order. Fade-in is reachable from the format menu only.
pub const TAB_ORDER: [ElementKind; 6] = [
    ElementKind::SceneHeading,
    ElementKind::Action,
    ElementKind::Character,
    ElementKind::Parenthetical,
    ElementKind::Dialogue,
    ElementKind::Transition,
];

static CONTD_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\(CONT'D\)\s*").expect("continuation pattern"));

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Next kind in the Tab cycle. Kinds outside the cycle restart it.
pub fn next_in_cycle(kind: ElementKind) -> ElementKind {
    match TAB_ORDER.iter().position(|k| *k == kind) {
        Some(index) => TAB_ORDER[(index + 1) % TAB_ORDER.len()],
        None => TAB_ORDER[0],
    }
}

/// Kind of the line created by Enter at the end of a line of kind `current`
pub fn next_on_enter(current: ElementKind, line_is_blank: bool, settings: &Settings) -> ElementKind {
    match current {
        ElementKind::SceneHeading => ElementKind::Action,
        ElementKind::Character | ElementKind::Parenthetical => ElementKind::Dialogue,
        ElementKind::Dialogue if line_is_blank => ElementKind::Action,
        ElementKind::Dialogue if settings.dialogue_enter_character => ElementKind::Character,
        ElementKind::Dialogue => ElementKind::Dialogue,
        ElementKind::Transition => ElementKind::SceneHeading,
        ElementKind::Action | ElementKind::FadeIn => ElementKind::Action,
    }
}

/// Kind inferred for a blank action line from the previous non-blank line.
///
/// `None` means the line stays an action line.
pub fn smart_default(previous: ElementKind) -> Option<ElementKind> {
    match previous {
        ElementKind::Character | ElementKind::Dialogue | ElementKind::Parenthetical => {
            Some(ElementKind::Dialogue)
        }
        ElementKind::Transition => Some(ElementKind::SceneHeading),
        _ => None,
    }
}

/// Smart default for the blank action line at `pos`, looking back across pages
pub fn smart_default_at(doc: &Document, pos: LinePos) -> Option<ElementKind> {
    let line = doc.line(pos)?;
    if !line.is_blank_action() {
        return None;
    }

    let mut cursor = doc.prev_pos(pos);
    while let Some(prev) = cursor {
        let candidate = doc.line(prev)?;
        if !candidate.is_blank_action() {
            return smart_default(candidate.kind);
        }
        cursor = doc.prev_pos(prev);
    }
    None
}

/// Character name with any `(CONT'D)` marker removed and whitespace collapsed
pub fn strip_contd(name: &str) -> String {
    let stripped = CONTD_SUFFIX.replace_all(name, " ");
    WHITESPACE_RUN.replace_all(stripped.trim(), " ").into_owned()
}

pub fn is_contd_header(line: &Line) -> bool {
    line.kind == ElementKind::Character && CONTD_SUFFIX.is_match(&line.text)
}

/// `"<NAME> (CONT'D)"` for a speaker
pub fn contd_header(base: &str) -> String {
    format!("{} (CONT'D)", base)
}

/// Nearest character cue above `pos`: the rest of the current page upward,
/// then the previous page from the bottom.
pub fn previous_character_name(doc: &Document, pos: LinePos) -> Option<String> {
    let page = doc.page(pos.page)?;
    let above = page.lines()[..pos.index.min(page.len())].iter().rev();

    let previous_page = pos
        .page
        .checked_sub(1)
        .and_then(|p| doc.page(p))
        .map(|page| page.lines().iter().rev())
        .into_iter()
        .flatten();

    above
        .chain(previous_page)
        .find(|line| line.kind == ElementKind::Character)
        .map(|line| strip_contd(&line.text))
        .filter(|name| !name.is_empty())
}

/// Upper-case the text of upper-case kinds in place.
///
/// Returns true when the text changed.
pub fn apply_casing(line: &mut Line, settings: &Settings) -> bool {
    if !settings.auto_uppercase_lines || !line.kind.is_uppercase() {
        return false;
    }
    let upper = line.text.to_uppercase();
    if upper == line.text {
        return false;
    }
    line.text = upper;
    true
}

/// Change a line's kind, returning the caret offset to restore.
///
/// Parenthetical wrapping keeps the caret inside the parens, shifting it by
/// one when they are added or removed.
pub fn reclassify(line: &mut Line, kind: ElementKind, offset: usize, settings: &Settings) -> usize {
    let previous = line.kind;
    line.kind = kind;
    let mut offset = offset.min(line.char_len());

    if settings.parentheticals_auto_parens {
        if kind == ElementKind::Parenthetical {
            offset = wrap_parens(line, offset);
        } else if previous == ElementKind::Parenthetical {
            offset = unwrap_parens(line, offset);
        }
    }

    apply_casing(line, settings);
    offset.min(line.char_len())
}

fn leading_whitespace(text: &str) -> usize {
    text.chars().take_while(|c| c.is_whitespace()).count()
}

fn wrap_parens(line: &mut Line, offset: usize) -> usize {
    let leading = leading_whitespace(&line.text);
    let trimmed = line.text.trim();

    if trimmed.is_empty() {
        line.text = "()".to_string();
        return 1;
    }

    if is_wrapped_in_parens(trimmed) {
        let relative = offset.saturating_sub(leading);
        line.text = trimmed.to_string();
        let end_inside = line.char_len().saturating_sub(1).max(1);
        return relative.clamp(1, end_inside);
    }

    let relative = offset.saturating_sub(leading);
    line.text = format!("({})", trimmed);
    let end_inside = line.char_len().saturating_sub(1).max(1);
    (relative + 1).clamp(1, end_inside)
}

fn unwrap_parens(line: &mut Line, offset: usize) -> usize {
    let leading = leading_whitespace(&line.text);
    let trimmed = line.text.trim();
    if !is_wrapped_in_parens(trimmed) {
        return offset;
    }

    let inner = trimmed[1..trimmed.len() - 1].trim().to_string();
    let inner_len = inner.chars().count();
    line.text = inner;
    offset.saturating_sub(leading).saturating_sub(1).min(inner_len)
}
