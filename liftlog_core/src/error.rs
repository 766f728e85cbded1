//! Error types for the liftlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for liftlog_core operations
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

    /// Requested key or workout does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Snapshot file or payload is unreadable or malformed
    #[error("corrupt data: {0}")]
    Corrupt(String),

    /// Caller contract violation, e.g. rows spanning multiple workouts
    #[error("inconsistent input: {0}")]
    Inconsistent(String),
}

impl Error {
    /// True iff this is the "no such resource" condition, which startup
    /// paths may treat as an empty initial state.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
