//! # Line Classifier
//!
//! Maps a line of plain text to an [`ElementKind`]. Used when importing plain
//! text; in the live editor the kind is assigned by the writer.
//!
//! Rules are checked in order and the first match wins:
//!
//! 1. `INT` / `EXT` / `EST` / `INT/EXT` / `INT./EXT` followed by `.` or
//!    whitespace → scene heading
//! 2. starts with `>` or ends with ` TO:` → transition
//! 3. wrapped in parentheses → parenthetical
//! 4. all caps, starts with a letter, shorter than 30 chars → character
//! 5. anything else (including blank lines) → action

use crate::ast::ElementKind;
use once_cell::sync::Lazy;
use regex::Regex;

static SCENE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(INT|EXT|EST|INT\.?/EXT)[.\s]").expect("scene heading pattern"));

static TRANSITION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i) TO:$").expect("transition pattern"));

/// Character cues are at most this many chars (exclusive)
pub const MAX_CHARACTER_CUE_LEN: usize = 30;

/// Classify a raw line of text. Pure and deterministic.
pub fn classify(raw: &str) -> ElementKind {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ElementKind::Action;
    }

    if SCENE_HEADING.is_match(trimmed) {
        return ElementKind::SceneHeading;
    }

    if trimmed.starts_with('>') || TRANSITION_SUFFIX.is_match(trimmed) {
        return ElementKind::Transition;
    }

    if is_wrapped_in_parens(trimmed) {
        return ElementKind::Parenthetical;
    }

    if is_character_cue(trimmed) {
        return ElementKind::Character;
    }

    ElementKind::Action
}

/// `(...)`, including the degenerate `()`
pub fn is_wrapped_in_parens(text: &str) -> bool {
    let text = text.trim();
    text.len() >= 2 && text.starts_with('(') && text.ends_with(')')
}

fn is_character_cue(trimmed: &str) -> bool {
    let starts_with_capital = trimmed
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase());
    let len = trimmed.chars().count();

    starts_with_capital
        && len > 0
        && len < MAX_CHARACTER_CUE_LEN
        && trimmed.to_uppercase() == trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_headings() {
        assert_eq!(classify("INT. KITCHEN - DAY"), ElementKind::SceneHeading);
        assert_eq!(classify("ext. beach - night"), ElementKind::SceneHeading);
        assert_eq!(classify("EST HOSPITAL"), ElementKind::SceneHeading);
        assert_eq!(classify("INT/EXT. CAR - MOVING"), ElementKind::SceneHeading);
        assert_eq!(classify("INT./EXT. CAR - MOVING"), ElementKind::SceneHeading);
        // Needs a separator after the prefix
        assert_eq!(classify("INTERIOR"), ElementKind::Character);
    }

    #[test]
    fn test_transitions() {
        assert_eq!(classify("CUT TO:"), ElementKind::Transition);
        assert_eq!(classify("smash cut to:"), ElementKind::Transition);
        assert_eq!(classify("> THE END <"), ElementKind::Transition);
    }

    #[test]
    fn test_parentheticals() {
        assert_eq!(classify("(quietly)"), ElementKind::Parenthetical);
        assert_eq!(classify("  (beat)  "), ElementKind::Parenthetical);
        assert_eq!(classify("(beat"), ElementKind::Action);
    }

    #[test]
    fn test_character_cues() {
        assert_eq!(classify("JOHN"), ElementKind::Character);
        assert_eq!(classify("MARY (V.O.)"), ElementKind::Character);
        assert_eq!(classify("John"), ElementKind::Action);
        assert_eq!(classify("1984"), ElementKind::Action);
        // 30 chars is too long for a cue
        assert_eq!(classify(&"A".repeat(30)), ElementKind::Action);
        assert_eq!(classify(&"A".repeat(29)), ElementKind::Character);
    }

    #[test]
    fn test_blank_and_default() {
        assert_eq!(classify(""), ElementKind::Action);
        assert_eq!(classify("   "), ElementKind::Action);
        assert_eq!(classify("She opens the door."), ElementKind::Action);
    }

    #[test]
    fn test_classification_is_deterministic() {
        for line in ["INT. KITCHEN - DAY", "(quietly)", "JOHN", "Hello.", ""] {
            assert_eq!(classify(line), classify(line));
        }
    }
}
