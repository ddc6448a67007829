//! Content digest error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum IntegrityError {
    #[error("integrity mismatch for {url}: expected {expected}, got {actual}")]
    Mismatch {
        url: String,
        expected: String,
        actual: String,
    },

    #[error("unsupported digest algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    #[error("invalid digest {input}: {reason}")]
    InvalidDigest { input: String, reason: String },
}

impl UserFacingError for IntegrityError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Mismatch { .. } => Some(
                "The downloaded bytes do not match the lockfile; the repository changed or the download was corrupted.",
            ),
            Self::UnsupportedAlgorithm { .. } => Some("Use a sha1, sha256 or sha512 digest."),
            Self::InvalidDigest { .. } => {
                Some("Digests must be ALG-BASE64 or ALG:HEX, e.g. sha256-47DEQpj8...")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Mismatch { .. } => "integrity.mismatch",
            Self::UnsupportedAlgorithm { .. } => "integrity.unsupported_algorithm",
            Self::InvalidDigest { .. } => "integrity.invalid_digest",
        };
        Some(code)
    }
}
