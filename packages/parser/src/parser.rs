//! Plain-text import.
//!
//! Each input line becomes one [`Line`], trimmed and classified. Everything
//! lands on a single page; splitting into physical pages is the pagination
//! engine's job.

use crate::ast::{Document, Line, Page};
use crate::classifier::classify;
use crate::error::{ParseError, ParseResult};
use tracing::info;

/// Parse plain screenplay text into a single-page document.
///
/// Rejects input that looks binary (contains NUL) instead of loading it
/// partially.
pub fn parse_plain_text(text: &str) -> ParseResult<Document> {
    if let Some(pos) = text.find('\0') {
        return Err(ParseError::binary_content(pos));
    }

    let lines: Vec<Line> = text
        .split('\n')
        .map(|raw| {
            let trimmed = raw.trim();
            Line::new(classify(trimmed), trimmed)
        })
        .collect();

    info!(lines = lines.len(), "imported plain text");

    Ok(Document::from_pages(vec![Page::from_lines(lines)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ElementKind;

    #[test]
    fn test_import_classifies_each_line() {
        let doc = parse_plain_text("INT. KITCHEN - DAY\n\nJOHN\n(quietly)\nPass the salt.\n").unwrap();
        let kinds: Vec<ElementKind> = doc.lines().map(|l| l.kind).collect();

        assert_eq!(
            kinds,
            vec![
                ElementKind::SceneHeading,
                ElementKind::Action,
                ElementKind::Character,
                ElementKind::Parenthetical,
                // No rule recognises dialogue in plain text
                ElementKind::Action,
                ElementKind::Action,
            ]
        );
    }

    #[test]
    fn test_import_keeps_blank_lines() {
        let doc = parse_plain_text("A\n\n\nB").unwrap();
        assert_eq!(doc.line_count(), 4);
        assert!(doc.lines().nth(1).unwrap().text.is_empty());
    }

    #[test]
    fn test_import_handles_crlf() {
        let doc = parse_plain_text("JOHN\r\nHello.\r\n").unwrap();
        assert_eq!(doc.lines().next().unwrap().text, "JOHN");
        assert_eq!(doc.lines().next().unwrap().kind, ElementKind::Character);
    }

    #[test]
    fn test_import_rejects_binary() {
        let err = parse_plain_text("abc\0def").unwrap_err();
        assert_eq!(err, ParseError::BinaryContent { pos: 3 });
    }
}
