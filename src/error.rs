//! Error types for draftdxf

use std::io;
use thiserror::Error;

/// Main error type for reading, writing and constructing entities
#[derive(Debug, Error)]
pub enum DxfError {
    /// The cursor moved past the last line of the document
    #[error("Unexpected end of input at line {line}")]
    UnexpectedEndOfInput { line: usize },

    /// A group code line that is not an integer (strict mode only)
    #[error("Invalid group code {value:?} at line {line}")]
    InvalidGroupCode { line: usize, value: String },

    /// Constructor invariant failure (too few points, zero radius, ...)
    #[error("Invalid {kind}: {reason}")]
    InvalidEntity { kind: String, reason: String },

    /// Entity routed to a block that was never defined
    #[error("Unknown block: {0}")]
    UnknownBlock(String),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error occurred while reading a stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

impl DxfError {
    /// Shorthand for an `InvalidEntity` error
    pub fn invalid_entity(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        DxfError::InvalidEntity {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for draftdxf operations
pub type Result<T> = std::result::Result<T, DxfError>;

impl From<String> for DxfError {
    fn from(s: String) -> Self {
        DxfError::Custom(s)
    }
}

impl From<&str> for DxfError {
    fn from(s: &str) -> Self {
        DxfError::Custom(s.to_string())
    }
}
