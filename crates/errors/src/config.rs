//! Configuration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("parse error: {message}")]
    ParseError { message: String },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("malformed HTTP_AUTH descriptor: {reason}")]
    MalformedAuthDescriptor { reason: String },
}

impl UserFacingError for ConfigError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Pass an existing file to --config or drop the flag."),
            Self::ParseError { .. } | Self::InvalidValue { .. } => {
                Some("Fix the configuration value and retry the command.")
            }
            Self::MalformedAuthDescriptor { .. } => {
                Some("HTTP_AUTH must look like basic:REALM:USER:PASSWORD.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotFound { .. } => "config.not_found",
            Self::ParseError { .. } => "config.parse_error",
            Self::InvalidValue { .. } => "config.invalid_value",
            Self::MalformedAuthDescriptor { .. } => "config.malformed_auth_descriptor",
        };
        Some(code)
    }
}
