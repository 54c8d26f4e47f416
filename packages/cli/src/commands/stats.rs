use super::{open_document, resolve};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use slugline_editor::DocumentStats;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Script or plain-text file
    pub path: PathBuf,

    /// Print statistics as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn stats(args: StatsArgs, cwd: &Path) -> Result<()> {
    let doc = open_document(&resolve(&args.path, cwd))?;
    let stats = DocumentStats::collect(doc.ast());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let title = doc.metadata.title.trim();
    if !title.is_empty() {
        println!("{}", title.bold());
    }
    println!("  Words: {}", stats.words);
    println!("  Pages: {}", stats.pages);
    println!("  Lines: {}", stats.lines);
    println!();
    println!("{}", "Scenes".bright_blue().bold());
    for (number, scene) in stats.scenes.iter().enumerate() {
        println!(
            "  {:>3}. {} {}",
            number + 1,
            scene.heading,
            format!("(p. {})", scene.page + 1).dimmed()
        );
    }
    Ok(())
}
