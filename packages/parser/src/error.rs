use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Malformed script data: {message}")]
    MalformedScript { message: String },

    #[error("Invalid line at page {page}, line {line}: {message}")]
    InvalidLine {
        page: usize,
        line: usize,
        message: String,
    },

    #[error("Plain text import contains binary content at byte {pos}")]
    BinaryContent { pos: usize },

    #[error("Serialization failed: {message}")]
    Serialization { message: String },
}

impl ParseError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedScript {
            message: message.into(),
        }
    }

    pub fn invalid_line(page: usize, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidLine {
            page,
            line,
            message: message.into(),
        }
    }

    pub fn binary_content(pos: usize) -> Self {
        Self::BinaryContent { pos }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        ParseError::malformed(e.to_string())
    }
}
