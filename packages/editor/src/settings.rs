//! Editor settings snapshot.
//!
//! The engine reads these flags but does not own their persistence. Every
//! field has a default, so partial JSON merges over the defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Wrap/unwrap text in `( )` when a line becomes/stops being a parenthetical
    pub parentheticals_auto_parens: bool,

    /// Upper-case scene headings, character cues, transitions and fade-ins as typed
    pub auto_uppercase_lines: bool,

    /// Enter after dialogue starts a character cue (otherwise more dialogue)
    pub dialogue_enter_character: bool,

    /// Pre-fill the previous speaker's name on the new character cue
    pub dialogue_continue_name: bool,

    /// Infer the kind of a blank line from the line above when navigating onto it
    pub smart_blank_line_defaults: bool,

    /// Suppress the page number on page 1
    pub page_numbers_start_on_page2: bool,

    pub include_title_page_in_print: bool,
    pub show_page_numbers_in_print: bool,
    pub print_header_style: PrintHeaderStyle,
    pub print_watermark_draft: bool,
    pub margin_preset: MarginPreset,

    /// Offer the combined INT/EXT prefix in scene heading quick picks
    pub scene_headings_int_ext_quick_pick: bool,
    pub scene_headings_int_ext_style: IntExtStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parentheticals_auto_parens: true,
            auto_uppercase_lines: true,
            dialogue_enter_character: true,
            dialogue_continue_name: true,
            smart_blank_line_defaults: true,
            page_numbers_start_on_page2: true,
            include_title_page_in_print: true,
            show_page_numbers_in_print: true,
            print_header_style: PrintHeaderStyle::None,
            print_watermark_draft: false,
            margin_preset: MarginPreset::Standard,
            scene_headings_int_ext_quick_pick: true,
            scene_headings_int_ext_style: IntExtStyle::Dotted,
        }
    }
}

impl Settings {
    /// Parse settings JSON, falling back to defaults for missing keys
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Quick-pick scene heading prefixes offered before a prefix is typed
    pub fn scene_quick_picks(&self) -> Vec<&'static str> {
        let mut picks = vec!["INT. ", "EXT. ", "EST. "];
        if self.scene_headings_int_ext_quick_pick {
            picks.insert(2, self.scene_headings_int_ext_style.prefix());
        }
        picks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintHeaderStyle {
    #[default]
    None,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginPreset {
    #[default]
    Standard,
    Narrow,
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntExtStyle {
    #[default]
    #[serde(rename = "INT./EXT.")]
    Dotted,
    #[serde(rename = "INT/EXT.")]
    Slashed,
}

impl IntExtStyle {
    pub fn prefix(&self) -> &'static str {
        match self {
            IntExtStyle::Dotted => "INT./EXT. ",
            IntExtStyle::Slashed => "INT/EXT. ",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_merge_over_defaults() {
        let settings = Settings::from_json(r#"{ "dialogueEnterCharacter": false }"#).unwrap();
        assert!(!settings.dialogue_enter_character);
        assert!(settings.parentheticals_auto_parens);
        assert!(settings.page_numbers_start_on_page2);
    }

    #[test]
    fn test_enum_settings_parse() {
        let settings = Settings::from_json(
            r#"{ "printHeaderStyle": "title", "marginPreset": "wide", "sceneHeadingsIntExtStyle": "INT/EXT." }"#,
        )
        .unwrap();
        assert_eq!(settings.print_header_style, PrintHeaderStyle::Title);
        assert_eq!(settings.margin_preset, MarginPreset::Wide);
        assert_eq!(settings.scene_headings_int_ext_style, IntExtStyle::Slashed);
    }

    #[test]
    fn test_quick_picks() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.scene_quick_picks(),
            vec!["INT. ", "EXT. ", "INT./EXT. ", "EST. "]
        );
        settings.scene_headings_int_ext_quick_pick = false;
        assert_eq!(settings.scene_quick_picks(), vec!["INT. ", "EXT. ", "EST. "]);
    }
}
