//! Error types for mesh input.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh input operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while reading a mesh file.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Invalid file content (parse error).
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// Binary facet records ended before the declared count.
    #[error("truncated STL: header declares {expected} facets, got {got}")]
    TruncatedFacets {
        /// Facet count declared in the header.
        expected: u32,
        /// Facets actually present.
        got: u32,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Float parsing error in ASCII input.
    #[error("float parsing error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
}

impl IoError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }
}
