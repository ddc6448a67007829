//! Environment capability errors detected before any real fetch

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Remediation text shown when the transport ignores range requests.
pub const RANGE_SETUP_GUIDANCE: &str = "\
The transport used to reach the package repository returned the full object
for a 1-byte range request. Packages are fetched as three byte ranges of one
remote file, so every import would fail later with a corrupted archive.

To fix this:
  * If your host tool is older than 7.1.0, range information is passed as a
    URL fragment (#_apk_range_bytes_START-END). Configure its downloader to
    rewrite that fragment into a `Range: bytes=START-END` header, or upgrade
    the host tool and set `range_strategy = \"header\"` under [host].
  * If a proxy or mirror sits between you and the repository, make sure it
    forwards the Range header and answers with 206 Partial Content.
  * Re-run `apkfetch probe --url <repository>/<arch>/APKINDEX.tar.gz` to
    confirm the fix before importing packages.";

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum SetupError {
    #[error(
        "environment misconfigured: a 1-byte range request to {url} returned {received} bytes\n\n{}",
        RANGE_SETUP_GUIDANCE
    )]
    EnvironmentMisconfigured { url: String, received: u64 },
}

impl UserFacingError for SetupError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::EnvironmentMisconfigured { .. } => {
                Some("Enable range requests for the repository host, then retry.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Self::EnvironmentMisconfigured { .. } => Some("setup.environment_misconfigured"),
        }
    }
}
