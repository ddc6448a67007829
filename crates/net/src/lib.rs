#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for apkfetch
//!
//! This crate owns everything that talks to a repository host: the HTTP
//! client, credential scoping, the two ways of asking for a byte range, the
//! verified range download itself and the one-time range-support probe.

mod auth;
mod client;
mod download;
mod probe;
mod range;

pub use auth::{AuthDescriptor, AuthScopeResolver, Credentials};
pub use client::{NetClient, NetConfig};
pub use download::{DownloadResult, RangeDownloader, ResponsePolicy};
pub use probe::{ProbeState, SetupProbe};
pub use range::{strategy_for, FetchRequest, FragmentRange, HeaderRange, RangeStrategy};

use apkfetch_errors::{Error, NetworkError};
use url::Url;

/// Parse and validate a URL
///
/// # Errors
///
/// Returns an error if the URL string is malformed.
pub fn parse_url(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|e| NetworkError::InvalidUrl(format!("{url}: {e}")).into())
}
