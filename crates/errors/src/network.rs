//! Network-related error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum NetworkError {
    #[error("connection timeout to {url}")]
    Timeout { url: String },

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported protocol: {protocol}")]
    UnsupportedProtocol { protocol: String },

    #[error("HTTP error {status} for {url}")]
    HttpError { url: String, status: u16 },

    #[error("server ignored range request for {url} (answered {status} instead of 206)")]
    PartialContentNotSupported { url: String, status: u16 },

    #[error("range {range} not satisfiable for {url}")]
    RangeNotSatisfiable { url: String, range: String },

    #[error("received {received} bytes for {range} of {url}, expected {expected}")]
    LengthMismatch {
        url: String,
        range: String,
        expected: u64,
        received: u64,
    },

    #[error("invalid byte range: {0}")]
    InvalidRange(String),
}

impl UserFacingError for NetworkError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Timeout { .. } | Self::ConnectionRefused(_) => {
                Some("Check network connectivity to the repository host.")
            }
            Self::HttpError { .. } => {
                Some("Verify the package URL and any HTTP_AUTH credentials for this host.")
            }
            Self::PartialContentNotSupported { .. } | Self::RangeNotSatisfiable { .. } => Some(
                "The repository host must honour HTTP range requests; regenerate the lockfile if ranges are stale.",
            ),
            Self::LengthMismatch { .. } => {
                Some("The remote object changed or was truncated; regenerate the lockfile.")
            }
            Self::InvalidUrl(_) | Self::UnsupportedProtocol { .. } | Self::InvalidRange(_) => {
                Some("Fix the import descriptor and retry.")
            }
            Self::DownloadFailed(_) => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::ConnectionRefused(_) | Self::DownloadFailed(_)
        )
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Timeout { .. } => "network.timeout",
            Self::DownloadFailed(_) => "network.download_failed",
            Self::ConnectionRefused(_) => "network.connection_refused",
            Self::InvalidUrl(_) => "network.invalid_url",
            Self::UnsupportedProtocol { .. } => "network.unsupported_protocol",
            Self::HttpError { .. } => "network.http_error",
            Self::PartialContentNotSupported { .. } => "network.partial_content_not_supported",
            Self::RangeNotSatisfiable { .. } => "network.range_not_satisfiable",
            Self::LengthMismatch { .. } => "network.length_mismatch",
            Self::InvalidRange(_) => "network.invalid_range",
        };
        Some(code)
    }
}
