//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Webload service call failed.
    #[error("Webload error: {0}")]
    Webload(#[from] fecfile_webload::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The report file could not be fetched.
    #[error("File source error: {0}")]
    Source(String),

    /// Filing state could not be recorded.
    #[error("Filing store error: {0}")]
    Store(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
