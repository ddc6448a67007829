//! HTTP byte ranges in `bytes=START-END` form

use apkfetch_errors::NetworkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix of the URL fragment that carries a range for hosts without
/// native range-header support.
pub const RANGE_FRAGMENT_PREFIX: &str = "_apk_range_";

/// A single byte range. `end` is inclusive; an absent `end` means "to the
/// end of the object".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    start: u64,
    end: Option<u64>,
}

impl ByteRange {
    /// Closed range `bytes=start-end`
    ///
    /// # Errors
    ///
    /// Returns an error if `end` is before `start`, or if the range covers
    /// more bytes than a `u64` can count.
    pub fn new(start: u64, end: u64) -> Result<Self, NetworkError> {
        if end < start || (end - start).checked_add(1).is_none() {
            return Err(NetworkError::InvalidRange(format!("bytes={start}-{end}")));
        }
        Ok(Self {
            start,
            end: Some(end),
        })
    }

    /// Open range `bytes=start-`
    #[must_use]
    pub fn from_offset(start: u64) -> Self {
        Self { start, end: None }
    }

    /// The single-byte range used by the setup probe
    #[must_use]
    pub fn first_byte() -> Self {
        Self {
            start: 0,
            end: Some(0),
        }
    }

    #[must_use]
    pub fn start(&self) -> u64 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Option<u64> {
        self.end
    }

    /// Number of bytes covered, when the range is closed
    #[must_use]
    pub fn len(&self) -> Option<u64> {
        self.end
            .and_then(|end| end.checked_sub(self.start)?.checked_add(1))
    }

    /// Header value, e.g. `bytes=0-668`
    #[must_use]
    pub fn header_value(&self) -> String {
        self.to_string()
    }

    /// Fragment encoding, e.g. `_apk_range_bytes_0-668`
    #[must_use]
    pub fn fragment(&self) -> String {
        format!("{RANGE_FRAGMENT_PREFIX}{}", self.to_string().replace('=', "_"))
    }

    /// Recover a range from a URL fragment produced by [`ByteRange::fragment`].
    /// Returns `None` when the fragment does not follow the convention.
    #[must_use]
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let encoded = fragment.strip_prefix(RANGE_FRAGMENT_PREFIX)?;
        let spec = encoded.strip_prefix("bytes_")?;
        format!("bytes={spec}").parse().ok()
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "bytes={}-{end}", self.start),
            None => write!(f, "bytes={}-", self.start),
        }
    }
}

impl FromStr for ByteRange {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NetworkError::InvalidRange(s.to_string());

        let spec = s.trim().strip_prefix("bytes=").ok_or_else(invalid)?;
        let (start, end) = spec.split_once('-').ok_or_else(invalid)?;
        let start: u64 = start.parse().map_err(|_| invalid())?;

        if end.is_empty() {
            return Ok(Self::from_offset(start));
        }

        let end: u64 = end.parse().map_err(|_| invalid())?;
        Self::new(start, end).map_err(|_| invalid())
    }
}

impl Serialize for ByteRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ByteRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
