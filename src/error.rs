//! Error types and exit codes for cache-check

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Main error type for cache-check operations
#[derive(Error, Debug)]
pub enum CacheCheckError {
    #[error("[{}] Didn't find {variable} for cache in line {line}", file.display())]
    UnresolvedCacheVariable {
        file: PathBuf,
        line: usize,
        variable: String,
    },

    #[error("Event payload not available: {message}")]
    MissingEventPayload { message: String },

    #[error("Event payload is malformed: {message}")]
    MalformedEventPayload { message: String },

    #[error("Failed to deliver comment: {message}")]
    DeliveryFailure { message: String },

    #[error("Git error: {message}")]
    GitError { message: String },

    #[error("Search error: {message}")]
    SearchError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CacheCheckError {
    /// Convert error to appropriate exit code:
    /// - 0: Success
    /// - 1: IO error
    /// - 2: (reserved for argument errors reported by clap)
    /// - 3: Unresolved cache variable
    /// - 4: Event payload missing or malformed
    /// - 5: Comment delivery failed
    /// - 6: Git error
    /// - 7: Search or configuration error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Io(_) => ExitCode::from(1),
            Self::UnresolvedCacheVariable { .. } => ExitCode::from(3),
            Self::MissingEventPayload { .. } => ExitCode::from(4),
            Self::MalformedEventPayload { .. } => ExitCode::from(4),
            Self::DeliveryFailure { .. } => ExitCode::from(5),
            Self::GitError { .. } => ExitCode::from(6),
            Self::SearchError { .. } => ExitCode::from(7),
            Self::ConfigError { .. } => ExitCode::from(7),
        }
    }
}

/// Result type alias for cache-check operations
pub type Result<T> = std::result::Result<T, CacheCheckError>;
