mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    import, paginate, print, stats, suggest, ImportArgs, PaginateArgs, PrintArgs, StatsArgs,
    SuggestArgs,
};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Slugline - screenplay pagination and formatting
#[derive(Parser, Debug)]
#[command(name = "slugline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to slugline.config.json in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a plain-text screenplay as a paginated script
    Import(ImportArgs),

    /// Re-flow a script into pages
    Paginate(PaginateArgs),

    /// Word count, page count and scene outline
    Stats(StatsArgs),

    /// Autocomplete suggestions for a partially typed line
    Suggest(SuggestArgs),

    /// Render the print layout
    Print(PrintArgs),
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(&cwd)?,
    };

    match cli.command {
        Command::Import(args) => import(args, &cwd, &config),
        Command::Paginate(args) => paginate(args, &cwd, &config),
        Command::Stats(args) => stats(args, &cwd),
        Command::Suggest(args) => suggest(args, &cwd, &config),
        Command::Print(args) => print(args, &cwd, &config),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
