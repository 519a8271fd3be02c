//! Error types and error handling for docrag.
//!
//! This module defines the error types used throughout the
//! crate. Per-file problems during a build are not errors at this
//! level: the pipeline logs and skips them. What reaches callers
//! is either a bad request (query, config, pattern) or a fatal
//! storage condition such as a missing index.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for docrag operations
pub type Result<T> = std::result::Result<T, DocragError>;

/// Main error type for docrag
#[derive(Error, Debug)]
pub enum DocragError {
    #[error("No index found in {0:?}. Run `docrag build` first to create it.")]
    IndexNotFound(PathBuf),

    #[error("Index is corrupt: {0}. Run `docrag build` to rebuild it.")]
    IndexCorrupt(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to replace index artifact: {0}")]
    PersistError(#[from] tempfile::PersistError),
}

impl DocragError {
    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocragError::IndexNotFound(_))
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            DocragError::InvalidQuery(_)
                | DocragError::InvalidPattern { .. }
                | DocragError::ConfigError(_)
        )
    }
}
