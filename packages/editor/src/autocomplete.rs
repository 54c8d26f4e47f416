//! # Autocomplete Index
//!
//! Character names and scene locations derived from the document. The index
//! is a cache: it is rebuilt wholesale from the current lines and never
//! persisted or maintained incrementally.

use crate::settings::Settings;
use indexmap::IndexSet;
use slugline_parser::{Document, ElementKind};

pub const MAX_SUGGESTIONS: usize = 5;

/// Recognised scene heading prefixes, in match order
pub const SCENE_PREFIXES: [&str; 5] = ["INT. ", "EXT. ", "INT/EXT. ", "INT./EXT. ", "EST. "];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteIndex {
    characters: IndexSet<String>,
    locations: IndexSet<String>,
    quick_picks: Vec<&'static str>,
}

impl Default for AutocompleteIndex {
    fn default() -> Self {
        Self {
            characters: IndexSet::new(),
            locations: SCENE_PREFIXES.iter().map(|p| p.to_string()).collect(),
            quick_picks: Settings::default().scene_quick_picks(),
        }
    }
}

impl AutocompleteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index for a document
    pub fn rebuild(doc: &Document) -> Self {
        let mut index = Self::new();
        index.refresh(doc);
        index
    }

    pub fn with_quick_picks(mut self, settings: &Settings) -> Self {
        self.set_quick_picks(settings);
        self
    }

    pub fn set_quick_picks(&mut self, settings: &Settings) {
        self.quick_picks = settings.scene_quick_picks();
    }

    /// Re-derive names and locations from `doc`, keeping the quick picks
    pub fn refresh(&mut self, doc: &Document) {
        self.characters.clear();
        self.locations = SCENE_PREFIXES.iter().map(|p| p.to_string()).collect();

        for line in doc.lines() {
            let text = line.text.trim().to_uppercase();
            match line.kind {
                ElementKind::Character if !text.is_empty() => {
                    self.characters.insert(text);
                }
                ElementKind::SceneHeading => {
                    if let Some((_, location)) = text.split_once(' ') {
                        if !location.is_empty() {
                            self.locations.insert(location.to_string());
                        }
                    }
                }
                _ => {}
            }
        }
    }

    pub fn characters(&self) -> impl Iterator<Item = &str> {
        self.characters.iter().map(String::as_str)
    }

    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(String::as_str)
    }

    /// Suggestions for the line being edited, at most [`MAX_SUGGESTIONS`]
    pub fn suggest(&self, kind: ElementKind, text: &str) -> Vec<String> {
        let query = text.trim().to_uppercase();

        match kind {
            ElementKind::Character if !query.is_empty() => self
                .characters
                .iter()
                .filter(|name| name.starts_with(&query) && **name != query)
                .take(MAX_SUGGESTIONS)
                .cloned()
                .collect(),
            ElementKind::SceneHeading => self.suggest_scene_heading(&query),
            _ => Vec::new(),
        }
    }

    fn suggest_scene_heading(&self, query: &str) -> Vec<String> {
        let Some(prefix) = SCENE_PREFIXES.iter().find(|p| query.starts_with(*p)) else {
            return self
                .quick_picks
                .iter()
                .filter(|pick| pick.starts_with(query))
                .take(MAX_SUGGESTIONS)
                .map(|pick| pick.to_string())
                .collect();
        };

        let rest = &query[prefix.len()..];
        self.locations
            .iter()
            // Seeded prefixes are never offered as locations, so "INT. INT. " cannot appear
            .filter(|location| !SCENE_PREFIXES.iter().any(|p| *p == location.as_str()))
            .filter(|location| location.starts_with(rest))
            .take(MAX_SUGGESTIONS)
            .map(|location| format!("{}{}", prefix, location))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slugline_parser::{Line, Page};

    fn doc() -> Document {
        Document::from_pages(vec![Page::from_lines(vec![
            Line::new(ElementKind::SceneHeading, "INT. KITCHEN - DAY"),
            Line::new(ElementKind::SceneHeading, "ext. kitchen garden - night"),
            Line::new(ElementKind::Character, "bob"),
            Line::new(ElementKind::Character, "BOBBY"),
            Line::new(ElementKind::Character, "  "),
            Line::new(ElementKind::Dialogue, "BOBCAT"),
        ])])
    }

    #[test]
    fn test_rebuild_collects_names_and_locations() {
        let index = AutocompleteIndex::rebuild(&doc());
        assert_eq!(index.characters().collect::<Vec<_>>(), vec!["BOB", "BOBBY"]);
        assert!(index.locations().any(|l| l == "KITCHEN - DAY"));
        assert!(index.locations().any(|l| l == "KITCHEN GARDEN - NIGHT"));
        assert!(index.locations().any(|l| l == "EST. "));
    }

    #[test]
    fn test_character_suggestions() {
        let index = AutocompleteIndex::rebuild(&doc());
        assert_eq!(index.suggest(ElementKind::Character, "bo"), vec!["BOB", "BOBBY"]);
        assert_eq!(index.suggest(ElementKind::Character, "BOB"), vec!["BOBBY"]);
        assert!(index.suggest(ElementKind::Character, "").is_empty());
        assert!(index.suggest(ElementKind::Action, "bo").is_empty());
    }

    #[test]
    fn test_scene_heading_prefix_quick_picks() {
        let index = AutocompleteIndex::rebuild(&doc());
        assert_eq!(
            index.suggest(ElementKind::SceneHeading, ""),
            vec!["INT. ", "EXT. ", "INT./EXT. ", "EST. "]
        );
        assert_eq!(index.suggest(ElementKind::SceneHeading, "e"), vec!["EXT. ", "EST. "]);

        let slashed = AutocompleteIndex::rebuild(&doc()).with_quick_picks(&Settings {
            scene_headings_int_ext_style: crate::settings::IntExtStyle::Slashed,
            ..Settings::default()
        });
        assert_eq!(slashed.suggest(ElementKind::SceneHeading, "INT/"), vec!["INT/EXT. "]);
    }

    #[test]
    fn test_scene_heading_location_suggestions() {
        let index = AutocompleteIndex::rebuild(&doc());
        assert_eq!(
            index.suggest(ElementKind::SceneHeading, "ext. kitchen g"),
            vec!["EXT. KITCHEN GARDEN - NIGHT"]
        );
        assert_eq!(
            index.suggest(ElementKind::SceneHeading, "INT./EXT. K"),
            vec!["INT./EXT. KITCHEN - DAY", "INT./EXT. KITCHEN GARDEN - NIGHT"]
        );
    }

    #[test]
    fn test_seeded_prefixes_are_not_locations() {
        let index = AutocompleteIndex::rebuild(&doc());
        assert!(index.locations().any(|location| location == "INT. "));
        assert!(index.suggest(ElementKind::SceneHeading, "int. i").is_empty());
        assert!(index.suggest(ElementKind::SceneHeading, "EXT. E").is_empty());
    }

    #[test]
    fn test_suggestions_are_capped() {
        let lines = (0..12)
            .map(|i| Line::new(ElementKind::Character, format!("SAM {}", i)))
            .collect();
        let doc = Document::from_pages(vec![Page::from_lines(lines)]);
        let index = AutocompleteIndex::rebuild(&doc);
        assert_eq!(index.suggest(ElementKind::Character, "S").len(), MAX_SUGGESTIONS);
    }
}
