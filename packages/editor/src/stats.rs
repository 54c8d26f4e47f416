//! Word count, page count and scene outline.

use serde::Serialize;
use slugline_parser::{Document, ElementKind};

pub const UNTITLED_SCENE: &str = "UNTITLED SCENE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneEntry {
    pub heading: String,
    pub page: usize,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub words: usize,
    pub pages: usize,
    pub lines: usize,
    pub scenes: Vec<SceneEntry>,
}

impl DocumentStats {
    pub fn collect(doc: &Document) -> Self {
        let words = doc
            .lines()
            .map(|line| line.text.split_whitespace().count())
            .sum();

        let scenes = doc
            .positions()
            .filter(|(_, line)| line.kind == ElementKind::SceneHeading)
            .map(|(pos, line)| {
                let heading = line.text.trim().to_uppercase();
                SceneEntry {
                    heading: if heading.is_empty() {
                        UNTITLED_SCENE.to_string()
                    } else {
                        heading
                    },
                    page: pos.page,
                    index: pos.index,
                }
            })
            .collect();

        Self {
            words,
            pages: doc.page_count(),
            lines: doc.line_count(),
            scenes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slugline_parser::{Line, Page};

    #[test]
    fn test_collect() {
        let doc = Document::from_pages(vec![
            Page::from_lines(vec![
                Line::new(ElementKind::SceneHeading, "int. house - day"),
                Line::new(ElementKind::Action, "Rain  hits the glass."),
            ]),
            Page::from_lines(vec![Line::blank(ElementKind::SceneHeading)]),
        ]);
        let stats = DocumentStats::collect(&doc);

        assert_eq!(stats.words, 8);
        assert_eq!(stats.pages, 2);
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.scenes[0].heading, "INT. HOUSE - DAY");
        assert_eq!(stats.scenes[1].heading, UNTITLED_SCENE);
        assert_eq!((stats.scenes[1].page, stats.scenes[1].index), (1, 0));
    }
}
