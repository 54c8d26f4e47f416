use super::{open_document, resolve};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use slugline_editor::{paginate, SCRIPT_EXTENSION};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Plain-text screenplay to import
    pub input: PathBuf,

    /// Output script file (defaults to the input with a .slug extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}

pub fn import(args: ImportArgs, cwd: &Path, config: &Config) -> Result<()> {
    let input = resolve(&args.input, cwd);
    let mut doc = open_document(&input)?;

    let report = paginate(doc.ast_mut(), &config.budget(), &config.settings);
    debug!(moved = report.moved_lines, "laid out imported script");

    let json = doc.to_json()?;
    if args.stdout {
        println!("{}", json);
        return Ok(());
    }

    let output = args
        .output
        .map(|path| resolve(&path, cwd))
        .unwrap_or_else(|| input.with_extension(SCRIPT_EXTENSION));
    std::fs::write(&output, json).with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "  {} {} → {} ({} lines, {} pages)",
        "✓".green(),
        input.display(),
        output.display(),
        doc.ast().line_count(),
        doc.ast().page_count()
    );
    if !report.accepted_overflow.is_empty() {
        println!(
            "  {} {} page(s) overflow with nothing left to move",
            "⚠️".yellow(),
            report.accepted_overflow.len()
        );
    }
    Ok(())
}
