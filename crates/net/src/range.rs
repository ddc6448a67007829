//! The two ways of asking a host for a byte range
//!
//! Capable hosts get a `Range` header. Older host tools cannot set headers
//! on their downloads, so the range rides along as a URL fragment that the
//! transport understands. The strategy is chosen once from
//! [`HostCapability`] and shared by every fetch of an invocation.

use crate::client::split_fragment;
use apkfetch_config::HostCapability;
use apkfetch_types::ByteRange;
use std::fmt::Debug;
use std::sync::Arc;

/// A request ready to hand to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    /// Range to send as a header; `None` when it is encoded in `url`
    pub header_range: Option<ByteRange>,
}

/// Turns a URL and a byte range into a transport request
pub trait RangeStrategy: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn prepare(&self, url: &str, range: &ByteRange) -> FetchRequest;
}

/// `Range: bytes=A-B` header
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderRange;

impl RangeStrategy for HeaderRange {
    fn name(&self) -> &'static str {
        "header"
    }

    fn prepare(&self, url: &str, range: &ByteRange) -> FetchRequest {
        FetchRequest {
            url: url.to_string(),
            header_range: Some(*range),
        }
    }
}

/// `url#_apk_range_bytes_A-B`
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentRange;

impl RangeStrategy for FragmentRange {
    fn name(&self) -> &'static str {
        "fragment"
    }

    fn prepare(&self, url: &str, range: &ByteRange) -> FetchRequest {
        let (base, _) = split_fragment(url);
        FetchRequest {
            url: format!("{base}#{}", range.fragment()),
            header_range: None,
        }
    }
}

/// Select the strategy for a detected host capability
#[must_use]
pub fn strategy_for(capability: HostCapability) -> Arc<dyn RangeStrategy> {
    match capability {
        HostCapability::RangeHeader => Arc::new(HeaderRange),
        HostCapability::UrlFragment => Arc::new(FragmentRange),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://packages.example.dev/os/x86_64/busybox-1.36.1-r2.apk";

    #[test]
    fn test_header_strategy() {
        let range = ByteRange::new(0, 668).unwrap();
        let request = HeaderRange.prepare(URL, &range);
        assert_eq!(request.url, URL);
        assert_eq!(request.header_range, Some(range));
    }

    #[test]
    fn test_fragment_strategy() {
        let range = ByteRange::new(669, 1023).unwrap();
        let request = FragmentRange.prepare(URL, &range);
        assert_eq!(request.url, format!("{URL}#_apk_range_bytes_669-1023"));
        assert_eq!(request.header_range, None);
    }

    #[test]
    fn test_fragment_replaces_existing_fragment() {
        let range = ByteRange::first_byte();
        let request = FragmentRange.prepare(&format!("{URL}#stale"), &range);
        assert_eq!(request.url, format!("{URL}#_apk_range_bytes_0-0"));
    }

    #[test]
    fn test_strategy_for_capability() {
        assert_eq!(strategy_for(HostCapability::RangeHeader).name(), "header");
        assert_eq!(strategy_for(HostCapability::UrlFragment).name(), "fragment");
    }
}
