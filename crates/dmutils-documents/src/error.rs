//! Error types for document handling and storage

use thiserror::Error;

/// Errors raised by a document store
///
/// Store errors are expected at runtime (permissions, outages) and callers
/// that validate uploads turn them into a failed validation rather than
/// propagating them.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store rejected the request
    #[error("Store responded {status}: {reason}")]
    Response { status: u16, reason: String },

    /// Local I/O failure while reading the upload or writing the object
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other store failure
    #[error("Store error: {0}")]
    Other(String),
}

impl StoreError {
    /// Create a response error
    pub fn response(status: u16, reason: impl Into<String>) -> Self {
        StoreError::Response {
            status,
            reason: reason.into(),
        }
    }
}

/// Errors raised while naming or publishing documents
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The question id has no document name suffix
    #[error("No document name is defined for field '{0}'")]
    UnknownDocumentField(String),

    /// The service record lacks an identifier needed for the document path
    #[error("Service record has no '{0}'")]
    MissingServiceField(String),

    /// The documents base URL could not be parsed or joined
    #[error("Invalid document URL: {0}")]
    InvalidUrl(String),

    /// I/O failure while reading an upload
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<url::ParseError> for DocumentError {
    fn from(err: url::ParseError) -> Self {
        DocumentError::InvalidUrl(err.to_string())
    }
}

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::response(403, "Forbidden");
        assert_eq!(err.to_string(), "Store responded 403: Forbidden");

        let err = DocumentError::UnknownDocumentField("q1".to_string());
        assert_eq!(err.to_string(), "No document name is defined for field 'q1'");
    }
}
