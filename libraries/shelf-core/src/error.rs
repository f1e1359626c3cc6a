/// Core error types for Soundshelf
use thiserror::Error;

/// Result type alias using `ShelfError`
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Core error type for Soundshelf
#[derive(Error, Debug)]
pub enum ShelfError {
    /// A required upload field was missing or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// An uploaded file exceeds the configured size limit
    #[error("{kind} file exceeds {limit} byte limit ({size} bytes)")]
    FileTooLarge {
        kind: &'static str,
        size: u64,
        limit: u64,
    },
}
