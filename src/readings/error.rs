//! Reading error types

use thiserror::Error;

/// Errors raised while interpreting a reading's fields
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadingError {
    /// Timestamp text did not match any supported format
    #[error("Malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    /// Status text is not part of the status vocabulary
    #[error("Unknown status: {0}")]
    UnknownStatus(String),
}

/// Result type alias for reading operations
pub type ReadingResult<T> = Result<T, ReadingError>;
