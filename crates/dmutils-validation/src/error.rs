//! Error types for answer validation
//!
//! A rule that rejects an answer is not an error: it is recorded in the
//! validation outcome. These errors cover broken content, misconfiguration
//! and unreadable input.

use dmutils_core::ContentError;
use dmutils_documents::DocumentError;
use thiserror::Error;

/// Main error type for validation operations
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Question content names a rule the validator does not know
    #[error("Validation rule {0} not found")]
    UnknownRule(String),

    /// Question content could not be loaded or lacks a posted question
    #[error(transparent)]
    Content(#[from] ContentError),

    /// A document could not be named or addressed
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// `file_can_be_saved` ran without an uploader
    #[error("No uploader configured to save {0}")]
    MissingUploader(String),

    /// The service record lacks an identifier needed to store documents
    #[error("Service record has no {0}")]
    MissingServiceField(String),

    /// Invalid validator configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Input file parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Output serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ValidationError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ValidationError::InvalidInput(msg.into())
    }

    /// Create a file error
    pub fn file_error(msg: impl Into<String>) -> Self {
        ValidationError::FileError(msg.into())
    }

    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        ValidationError::ParseError(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ValidationError::Config(msg.into())
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ValidationError::InvalidInput(_)
                | ValidationError::FileError(_)
                | ValidationError::ParseError(_)
        )
    }

    /// Whether the error comes from question content or configuration
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            ValidationError::UnknownRule(_)
                | ValidationError::Content(_)
                | ValidationError::Document(DocumentError::UnknownDocumentField(_))
                | ValidationError::Document(DocumentError::InvalidUrl(_))
                | ValidationError::MissingUploader(_)
                | ValidationError::Config(_)
        )
    }
}

impl From<std::io::Error> for ValidationError {
    fn from(err: std::io::Error) -> Self {
        ValidationError::FileError(err.to_string())
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::ParseError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for ValidationError {
    fn from(err: serde_yaml::Error) -> Self {
        ValidationError::ParseError(format!("YAML error: {}", err))
    }
}

impl From<toml::de::Error> for ValidationError {
    fn from(err: toml::de::Error) -> Self {
        ValidationError::ParseError(format!("TOML error: {}", err))
    }
}

/// Result type alias for validation operations
pub type Result<T> = std::result::Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::UnknownRule("not_a_rule".to_string());
        assert_eq!(err.to_string(), "Validation rule not_a_rule not found");

        let err: ValidationError = ContentError::QuestionNotFound("q1".to_string()).into();
        assert_eq!(err.to_string(), "Question not found: q1");
    }

    #[test]
    fn test_is_user_error() {
        assert!(ValidationError::invalid_input("test").is_user_error());
        assert!(ValidationError::file_error("test").is_user_error());
        assert!(ValidationError::parse_error("test").is_user_error());
        assert!(!ValidationError::UnknownRule("test".to_string()).is_user_error());
        assert!(!ValidationError::SerializationError("test".to_string()).is_user_error());
    }

    #[test]
    fn test_is_content_error() {
        assert!(ValidationError::UnknownRule("x".to_string()).is_content_error());
        assert!(ValidationError::config("bad url").is_content_error());
        assert!(
            ValidationError::from(DocumentError::UnknownDocumentField("q1".to_string()))
                .is_content_error()
        );
        assert!(!ValidationError::MissingServiceField("id".to_string()).is_content_error());
        assert!(!ValidationError::file_error("missing").is_content_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(ValidationError::from(io), ValidationError::FileError(_)));
    }
}
