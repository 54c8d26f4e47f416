//! # Script Data
//!
//! Persistence format consumed by save/open/autosave and share:
//!
//! ```json
//! {
//!   "metadata": { "title": "...", "author": "..." },
//!   "content": [ { "lines": [ { "kind": "character", "text": "BOB" } ] } ]
//! }
//! ```
//!
//! Kind, text and dual-dialogue tags survive a round trip. Line identities are
//! session-local and are re-assigned on load.

use crate::ast::{Document, ElementKind, Line, Page, TitlePage};
use crate::error::{ParseError, ParseResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Title page metadata plus the serialized page store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptData {
    #[serde(default)]
    pub metadata: TitlePage,
    pub content: Vec<Page>,
}

impl ScriptData {
    pub fn from_document(document: &Document, metadata: TitlePage) -> Self {
        Self {
            metadata,
            content: document.pages().to_vec(),
        }
    }

    pub fn into_document(self) -> Document {
        Document::from_pages(self.content)
    }

    /// Starter document for a new script
    pub fn template(metadata: TitlePage) -> Self {
        let lines = vec![
            Line::new(ElementKind::FadeIn, "FADE IN:"),
            Line::blank(ElementKind::Action),
            Line::new(ElementKind::SceneHeading, "INT. SOMEWHERE INTERESTING - DAY"),
            Line::new(
                ElementKind::Action,
                "A vivid action line. Keep it lean. Keep it visual.",
            ),
            Line::blank(ElementKind::Action),
            Line::new(ElementKind::Character, "YOU"),
            Line::new(ElementKind::Parenthetical, "(testing the format)"),
            Line::new(
                ElementKind::Dialogue,
                "Type like a screenwriter. Hit Tab to cycle elements while writing.",
            ),
            Line::blank(ElementKind::Action),
            Line::new(ElementKind::Transition, "CUT TO:"),
        ];

        Self {
            metadata,
            content: vec![Page::from_lines(lines)],
        }
    }

    /// Apply display casing to the stored text, so saved output matches the view
    pub fn bake_display_casing(&mut self) {
        let pages = std::mem::take(&mut self.content);
        self.content = pages
            .into_iter()
            .map(|page| {
                let lines = page
                    .lines()
                    .iter()
                    .map(|line| {
                        let mut baked = line.clone();
                        baked.text = line.display_text().into_owned();
                        baked
                    })
                    .collect();
                Page::from_lines(lines)
            })
            .collect();
    }

    fn validate(&self) -> ParseResult<()> {
        for (page_index, page) in self.content.iter().enumerate() {
            for (line_index, line) in page.lines().iter().enumerate() {
                if line.text.contains(['\n', '\r']) {
                    return Err(ParseError::invalid_line(
                        page_index,
                        line_index,
                        "line text contains a line break",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Parse persisted script JSON. Malformed input is rejected as a whole.
pub fn parse_script(json: &str) -> ParseResult<ScriptData> {
    let data: ScriptData = serde_json::from_str(json)?;
    data.validate()?;

    info!(
        pages = data.content.len(),
        title = %data.metadata.title,
        "loaded script data"
    );

    Ok(data)
}

/// Serialize script data for saving, with display casing baked in
pub fn serialize_script(data: &ScriptData) -> ParseResult<String> {
    let mut baked = data.clone();
    baked.bake_display_casing();

    let json = serde_json::to_string_pretty(&baked)
        .map_err(|e| ParseError::serialization(e.to_string()))?;

    debug!(bytes = json.len(), "serialized script data");
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DualSide, DualTag, LinePos};

    #[test]
    fn test_round_trip_keeps_kind_text_and_dual_tags() {
        let mut doc = ScriptData::template(TitlePage::default()).into_document();
        let group = doc.allocate_group();
        doc.line_mut(LinePos::new(0, 5)).unwrap().dual = Some(DualTag {
            group,
            side: DualSide::Right,
        });

        let data = ScriptData::from_document(&doc, TitlePage {
            title: "Rain".to_string(),
            ..TitlePage::default()
        });
        let json = serialize_script(&data).unwrap();
        let loaded = parse_script(&json).unwrap();

        assert_eq!(loaded.metadata.title, "Rain");
        let reloaded = loaded.into_document();
        let before: Vec<_> = doc.lines().map(|l| (l.kind, l.text.clone(), l.dual)).collect();
        let after: Vec<_> = reloaded.lines().map(|l| (l.kind, l.text.clone(), l.dual)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_serialize_bakes_casing() {
        let data = ScriptData {
            metadata: TitlePage::default(),
            content: vec![Page::from_lines(vec![
                Line::new(ElementKind::Character, "bob"),
                Line::new(ElementKind::Dialogue, "quiet words"),
            ])],
        };
        let json = serialize_script(&data).unwrap();
        assert!(json.contains("\"BOB\""));
        assert!(json.contains("\"quiet words\""));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_script("{\"content\": 12}"),
            Err(ParseError::MalformedScript { .. })
        ));
        assert!(matches!(
            parse_script("{\"content\": [{\"lines\": [{\"kind\": \"montage\", \"text\": \"x\"}]}]}"),
            Err(ParseError::MalformedScript { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_multiline_text() {
        let json = r#"{"content": [{"lines": [{"kind": "action", "text": "a\nb"}]}]}"#;
        assert_eq!(
            parse_script(json),
            Err(ParseError::invalid_line(0, 0, "line text contains a line break"))
        );
    }

    #[test]
    fn test_missing_metadata_defaults() {
        let data = parse_script(r#"{"content": []}"#).unwrap();
        assert_eq!(data.metadata, TitlePage::default());
        assert_eq!(data.into_document().page_count(), 1);
    }
}
