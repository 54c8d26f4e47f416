//! # Document Handle
//!
//! A script being edited: the paginated body, its title page metadata and
//! where it came from.
//!
//! Documents can be:
//! - **Memory-backed**: new scripts, templates, tests
//! - **File-backed**: opened from disk and saved back as script JSON
//!
//! Plain-text files are imported through the classifier; everything else is
//! read as script JSON. Saving always writes script JSON with display casing
//! baked in.

use crate::EditorError;
use slugline_parser::{
    parse_plain_text, parse_script, serialize_script, Document as ASTDocument, ScriptData, TitlePage,
};
use std::path::{Path, PathBuf};
use tracing::info;

pub const SCRIPT_EXTENSION: &str = "slug";

/// Editable screenplay document
#[derive(Debug, Clone)]
pub struct Document {
    /// Path of the backing file, or a display name for memory documents
    pub path: PathBuf,

    /// Increments on every applied mutation
    pub version: u64,

    pub metadata: TitlePage,

    storage: DocumentStorage,
}

/// Storage backend for document
#[derive(Debug, Clone)]
pub enum DocumentStorage {
    Memory { ast: ASTDocument },
    File { ast: ASTDocument, dirty: bool },
}

/// Plain text is imported, anything else is script JSON
fn is_plain_text(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

fn parse_source(path: &Path, source: &str) -> Result<(ASTDocument, TitlePage), EditorError> {
    if is_plain_text(path) {
        Ok((parse_plain_text(source)?, TitlePage::default()))
    } else {
        let data = parse_script(source)?;
        let metadata = data.metadata.clone();
        Ok((data.into_document(), metadata))
    }
}

impl Document {
    /// Memory-backed document around an existing page store
    pub fn new(path: impl Into<PathBuf>, ast: ASTDocument, metadata: TitlePage) -> Self {
        Self {
            path: path.into(),
            version: 0,
            metadata,
            storage: DocumentStorage::Memory { ast },
        }
    }

    /// Create document from source text (memory-backed)
    pub fn from_source(path: impl Into<PathBuf>, source: &str) -> Result<Self, EditorError> {
        let path = path.into();
        let (ast, metadata) = parse_source(&path, source)?;
        Ok(Self::new(path, ast, metadata))
    }

    /// Starter script for a new document
    pub fn template(path: impl Into<PathBuf>, metadata: TitlePage) -> Self {
        Self::new(path, ScriptData::template(metadata.clone()).into_document(), metadata)
    }

    /// Load document from file (file-backed)
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, EditorError> {
        let path = path.into();
        let source = std::fs::read_to_string(&path)?;
        let (ast, metadata) = parse_source(&path, &source)?;

        info!(path = %path.display(), lines = ast.line_count(), "opened script");

        Ok(Self {
            path,
            version: 0,
            metadata,
            storage: DocumentStorage::File { ast, dirty: false },
        })
    }

    pub fn ast(&self) -> &ASTDocument {
        match &self.storage {
            DocumentStorage::Memory { ast } | DocumentStorage::File { ast, .. } => ast,
        }
    }

    /// Mutable page store; marks file-backed documents dirty
    pub fn ast_mut(&mut self) -> &mut ASTDocument {
        match &mut self.storage {
            DocumentStorage::Memory { ast } => ast,
            DocumentStorage::File { ast, dirty } => {
                *dirty = true;
                ast
            }
        }
    }

    pub fn is_file_backed(&self) -> bool {
        matches!(self.storage, DocumentStorage::File { .. })
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty, .. } => *dirty,
            DocumentStorage::Memory { .. } => false,
        }
    }

    /// Override the dirty flag of a file-backed document
    pub fn set_dirty(&mut self, value: bool) {
        if let DocumentStorage::File { dirty, .. } = &mut self.storage {
            *dirty = value;
        }
    }

    pub fn to_script_data(&self) -> ScriptData {
        ScriptData::from_document(self.ast(), self.metadata.clone())
    }

    /// Script JSON with display casing baked in
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serialize_script(&self.to_script_data())?)
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        if !self.is_file_backed() {
            return Err(EditorError::NotFileBacked);
        }

        let json = self.to_json()?;
        std::fs::write(&self.path, json)?;
        if let DocumentStorage::File { dirty, .. } = &mut self.storage {
            *dirty = false;
        }

        info!(path = %self.path.display(), "saved script");
        Ok(())
    }

    /// Write to a new path and keep the document backed by it
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<(), EditorError> {
        self.path = path.into();
        let ast = match std::mem::replace(
            &mut self.storage,
            DocumentStorage::Memory {
                ast: ASTDocument::new(),
            },
        ) {
            DocumentStorage::Memory { ast } | DocumentStorage::File { ast, .. } => ast,
        };
        self.storage = DocumentStorage::File { ast, dirty: true };
        self.save()
    }
}
