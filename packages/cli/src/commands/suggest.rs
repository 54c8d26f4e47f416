use super::{open_document, resolve};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use slugline_editor::{AutocompleteIndex, ElementKind};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct SuggestArgs {
    /// Script providing names and locations
    pub path: PathBuf,

    /// Element kind being typed (character, scene-heading)
    #[arg(short, long, default_value = "character")]
    pub kind: ElementKind,

    /// Text typed so far
    #[arg(default_value = "")]
    pub query: String,
}

pub fn suggest(args: SuggestArgs, cwd: &Path, config: &Config) -> Result<()> {
    let doc = open_document(&resolve(&args.path, cwd))?;
    let index = AutocompleteIndex::rebuild(doc.ast()).with_quick_picks(&config.settings);
    let suggestions = index.suggest(args.kind, &args.query);

    if suggestions.is_empty() {
        println!("{}", "No suggestions".dimmed());
    }
    for suggestion in suggestions {
        println!("{}", suggestion);
    }
    Ok(())
}
