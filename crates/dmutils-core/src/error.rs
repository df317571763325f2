//! Error types for question content handling

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or querying question content
#[derive(Error, Debug)]
pub enum ContentError {
    /// A manifest, question file or message block could not be found
    #[error("Content not found: {0}")]
    ContentNotFound(String),

    /// A question id is not described by the loaded content
    #[error("Question not found: {0}")]
    QuestionNotFound(String),

    /// A content file exists but could not be parsed
    #[error("Failed to parse {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    /// Content was parsed but is structurally invalid
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// I/O error while reading content files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContentError {
    /// Create a content-not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        ContentError::ContentNotFound(msg.into())
    }

    /// Create a parse error for the given file
    pub fn parse_error(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        ContentError::ParseError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ContentError {
    fn from(err: serde_yaml::Error) -> Self {
        ContentError::InvalidContent(format!("YAML error: {}", err))
    }
}

/// Result type alias for content operations
pub type Result<T> = std::result::Result<T, ContentError>;
