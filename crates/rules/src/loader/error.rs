//! Error types and load result structures for the policy loader.

use std::path::PathBuf;

/// Errors that can occur while loading policy documents.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Document validation error (wrong kind, missing id, duplicate id).
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result alias for loader operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Outcome of loading a single policy file.
#[derive(Debug)]
pub struct LoadResult {
    /// Path to the file that was loaded.
    pub path: PathBuf,
    /// Status of the load attempt.
    pub status: LoadStatus,
}

/// Status of a single file load attempt.
#[derive(Debug)]
pub enum LoadStatus {
    /// Policy was successfully loaded.
    Loaded { policy_id: String, rules: usize },
    /// File was skipped (dotfile, non-YAML, disabled policy).
    Skipped { reason: String },
    /// Parse or validation error occurred.
    Failed { error: String },
}
