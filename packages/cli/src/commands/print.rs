use super::{open_document, resolve};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use slugline_editor::{paginate, PrintLayout};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct PrintArgs {
    /// Script to lay out
    pub path: PathBuf,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit the layout as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Stamp every page with a DRAFT watermark
    #[arg(long)]
    pub draft: bool,
}

pub fn print(args: PrintArgs, cwd: &Path, config: &Config) -> Result<()> {
    let mut doc = open_document(&resolve(&args.path, cwd))?;

    let mut settings = config.settings.clone();
    settings.print_watermark_draft |= args.draft;

    paginate(doc.ast_mut(), &config.budget(), &settings);
    let layout = PrintLayout::build(doc.ast(), &doc.metadata, &settings);

    let rendered = if args.json {
        serde_json::to_string_pretty(&layout)?
    } else {
        layout.render_text()
    };

    match args.output {
        Some(output) => {
            let output = resolve(&output, cwd);
            std::fs::write(&output, rendered)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "  {} {} pages → {}",
                "✓".green(),
                layout.pages.len(),
                output.display()
            );
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
