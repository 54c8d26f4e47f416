use serde::{Deserialize, Serialize};
use slugline_editor::{LineBudget, Settings, DEFAULT_LINES_PER_PAGE};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "slugline.config.json";

/// Slugline configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Editor settings; missing keys keep their defaults
    #[serde(default)]
    pub settings: Settings,

    /// Rows that fit on one printed page
    #[serde(default = "default_lines_per_page")]
    pub lines_per_page: usize,
}

fn default_lines_per_page() -> usize {
    DEFAULT_LINES_PER_PAGE
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        Self::load_from(&cwd.join(DEFAULT_CONFIG_NAME))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Overflow oracle for this config's page size and margins
    pub fn budget(&self) -> LineBudget {
        LineBudget::from_settings(&self.settings, self.lines_per_page)
    }

    pub fn path_in(cwd: &Path) -> PathBuf {
        cwd.join(DEFAULT_CONFIG_NAME)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            lines_per_page: default_lines_per_page(),
        }
    }
}
