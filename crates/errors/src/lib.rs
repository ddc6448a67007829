#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for apkfetch
//!
//! This crate provides fine-grained error types organized by domain.
//! Every failure is fatal to the import that raised it; the types carry
//! enough context to render an actionable message without a retry loop.

use std::borrow::Cow;

use thiserror::Error;

pub mod config;
pub mod integrity;
pub mod lockfile;
pub mod network;
pub mod setup;
pub mod storage;

// Re-export all error types at the root
pub use config::ConfigError;
pub use integrity::IntegrityError;
pub use lockfile::LockfileError;
pub use network::NetworkError;
pub use setup::SetupError;
pub use storage::StorageError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("setup error: {0}")]
    Setup(#[from] SetupError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("lockfile error: {0}")]
    Lockfile(#[from] LockfileError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("I/O error: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
        path: Option<std::path::PathBuf>,
    },
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an Io error with an associated path
    pub fn io_with_path(err: &std::io::Error, path: impl Into<std::path::PathBuf>) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: Some(path.into()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Lockfile(LockfileError::ParseError {
            message: err.to_string(),
        })
    }
}

/// Result type alias for apkfetch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether a caller-driven retry of the same import is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Network(err) => err.user_message(),
            Error::Integrity(err) => err.user_message(),
            Error::Setup(err) => err.user_message(),
            Error::Storage(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
            Error::Lockfile(err) => err.user_message(),
            Error::Io { message, path, .. } => match path {
                Some(path) => Cow::Owned(format!("{}: {message}", path.display())),
                None => Cow::Borrowed(message.as_str()),
            },
            Error::Internal(_) => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Network(err) => err.user_hint(),
            Error::Integrity(err) => err.user_hint(),
            Error::Setup(err) => err.user_hint(),
            Error::Storage(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
            Error::Lockfile(err) => err.user_hint(),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Network(err) => err.is_retryable(),
            Error::Storage(err) => err.is_retryable(),
            Error::Io { .. } => true,
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Network(err) => err.user_code(),
            Error::Integrity(err) => err.user_code(),
            Error::Setup(err) => err.user_code(),
            Error::Storage(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
            Error::Lockfile(err) => err.user_code(),
            Error::Internal(_) => Some("error.internal"),
            Error::Io { .. } => Some("error.io"),
        }
    }
}
