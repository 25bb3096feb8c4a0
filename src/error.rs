//! Error types for h3advisor
//!
//! Uses `thiserror` for library errors; `anyhow` only at the binary boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for advisor operations
pub type AdvisorResult<T> = Result<T, AdvisorError>;

/// Main error type for advisor operations
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Save directory missing at watcher construction
    #[error("save directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Configuration file unreadable or malformed
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Save file could not be parsed
    #[error("failed to parse save file {file}: {message}")]
    ParseFailed { file: PathBuf, message: String },

    /// Filesystem notification subsystem error
    #[error("watch error: {0}")]
    Watch(String),

    /// Query service failed to start or stop
    #[error("query service error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
