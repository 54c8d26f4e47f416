use super::{open_document, resolve};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use slugline_editor::paginate as run_pagination;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct PaginateArgs {
    /// Script file to re-flow
    pub path: PathBuf,

    /// Override the configured rows per page
    #[arg(short, long)]
    pub lines_per_page: Option<usize>,

    /// Save the re-flowed pages back to the file
    #[arg(short, long)]
    pub write: bool,

    /// Print the pagination report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn paginate(args: PaginateArgs, cwd: &Path, config: &Config) -> Result<()> {
    let path = resolve(&args.path, cwd);
    let mut doc = open_document(&path)?;

    let mut config = config.clone();
    if let Some(lines) = args.lines_per_page {
        config.lines_per_page = lines;
    }

    let report = run_pagination(doc.ast_mut(), &config.budget(), &config.settings);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", "📄 Pagination".bright_blue().bold());
        println!("  Pages:          {}", doc.ast().page_count());
        println!("  Lines moved:    {}", report.moved_lines);
        println!("  (CONT'D) added: {}", report.continuations);
        for page in &report.accepted_overflow {
            println!("  {} page {} overflows", "⚠️".yellow(), page + 1);
        }
    }

    if args.write {
        if doc.is_file_backed() && path.extension().is_some_and(|ext| ext != "txt") {
            doc.save()?;
        } else {
            doc.save_as(path.with_extension(slugline_editor::SCRIPT_EXTENSION))?;
        }
        println!("  {} saved {}", "✓".green(), doc.path.display());
    }
    Ok(())
}
