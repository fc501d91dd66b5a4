//! Centralized error types for attachguard.
//!
//! Policy evaluation itself never returns an error: every failure of a
//! platform collaborator is folded into the most restrictive verdict.
//! These errors surface from configuration, message parsing and the
//! collaborator traits.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the attachguard library.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// The message could not be parsed as MIME.
    #[error("MIME decoding error: {0}")]
    MimeError(String),

    /// The requested attachment part does not exist in the message.
    #[error("Attachment #{index} not found (message has {available} attachment(s))")]
    AttachmentNotFound { index: usize, available: usize },

    /// A configuration or device snapshot file could not be understood.
    #[error("Invalid configuration in '{path}': {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    /// A platform collaborator could not answer a query.
    #[error("Platform service unavailable: {0}")]
    PlatformUnavailable(String),
}

/// Convenience alias for `Result<T, PolicyError>`.
pub type Result<T> = std::result::Result<T, PolicyError>;

impl PolicyError {
    /// Create an `Io` variant from a path and an `io::Error`.
    ///
    /// `NotFound` is mapped to [`PolicyError::FileNotFound`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::FileNotFound(path);
        }
        Self::Io { path, source }
    }

    /// Create an `InvalidConfig` variant.
    pub fn invalid_config(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::InvalidConfig {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
