//! Storage and filesystem-related error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("atomic rename failed: {message}")]
    AtomicRenameFailed { message: String },

    #[error("cannot assemble package: {segment} segment missing or empty at {path}")]
    AssemblyIncomplete { segment: String, path: String },
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            message: err.to_string(),
        }
    }
}

impl UserFacingError for StorageError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        if let Self::AssemblyIncomplete { .. } = self {
            Some("A segment download produced no bytes; check the byte ranges in the lockfile.")
        } else {
            None
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::IoError { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::IoError { .. } => "storage.io_error",
            Self::AtomicRenameFailed { .. } => "storage.atomic_rename_failed",
            Self::AssemblyIncomplete { .. } => "storage.assembly_incomplete",
        };
        Some(code)
    }
}
