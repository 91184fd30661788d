//! Error types for the lift_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lift_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Unknown program or exercise key
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation invoked in a session state that forbids it
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A history or baseline store operation did not succeed. The
    /// in-memory session remains valid; the caller may retry.
    #[error("store failure: {0}")]
    Store(String),
}

impl Error {
    /// True for recoverable persistence failures (retry is safe).
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Error::Store(_))
    }
}
