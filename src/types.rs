//! Crate-wide error type and result alias

use thiserror::Error;

/// Errors surfaced by woodshed services and routes
#[derive(Debug, Error)]
pub enum WoodshedError {
    /// MongoDB connection or query failure
    #[error("Database error: {0}")]
    Database(String),

    /// Content file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown category, file, or record
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or malformed request parameter
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Anything that should never happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, WoodshedError>;
