//! Error types for the sieve library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cleaning runs.
#[derive(Debug, Error)]
pub enum SieveError {
    /// Input file is unreadable or structurally invalid.
    #[error("Malformed input '{path}': {reason}")]
    MalformedInput { path: PathBuf, reason: String },

    /// Invalid parameters or a reference to a field the table does not have.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The artifact store could not serve or accept the request.
    #[error("Artifact store unavailable: {0}")]
    StoreUnavailable(String),

    /// No artifact matches the requested name and version.
    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SieveError {
    /// Shorthand for wrapping an IO error with the path it concerns.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SieveError::Io {
            path: path.into(),
            source,
        }
    }

    /// Shorthand for a malformed-input error.
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SieveError::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for sieve operations.
pub type Result<T> = std::result::Result<T, SieveError>;
