//! Error types for the editor

use slugline_parser::LineId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] slugline_parser::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Document is not file-backed")]
    NotFileBacked,

    #[error("Line {0:?} is not part of the document")]
    UnknownLine(LineId),
}
