pub mod import;
pub mod paginate;
pub mod print;
pub mod stats;
pub mod suggest;

pub use import::{import, ImportArgs};
pub use paginate::{paginate, PaginateArgs};
pub use print::{print, PrintArgs};
pub use stats::{stats, StatsArgs};
pub use suggest::{suggest, SuggestArgs};

use anyhow::{anyhow, Context, Result};
use slugline_editor::Document;
use std::path::{Path, PathBuf};

/// Resolve `path` against the working directory
pub fn resolve(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Open a script or plain-text file
pub fn open_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(anyhow!("File does not exist: {}", path.display()));
    }
    Document::load(path).with_context(|| format!("Failed to open {}", path.display()))
}
