//! Lockfile error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum LockfileError {
    #[error("lockfile not found: {path}")]
    NotFound { path: String },

    #[error("failed to parse lockfile: {message}")]
    ParseError { message: String },

    #[error("package {package} has no {field}")]
    MissingField { package: String, field: String },
}

impl UserFacingError for LockfileError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        Some("Regenerate the lockfile with the tool that produced it.")
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotFound { .. } => "lockfile.not_found",
            Self::ParseError { .. } => "lockfile.parse_error",
            Self::MissingField { .. } => "lockfile.missing_field",
        };
        Some(code)
    }
}
