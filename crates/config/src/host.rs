//! Host capability gate selecting how byte ranges are requested

use crate::constants::RANGE_HEADER_MIN_VERSION;
use apkfetch_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the user asked for ranges to be transported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeStrategyChoice {
    /// Decide from the host version
    #[default]
    Auto,
    /// Always send a `Range` header
    Header,
    /// Always encode the range as a URL fragment
    Fragment,
}

impl FromStr for RangeStrategyChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "header" => Ok(Self::Header),
            "fragment" => Ok(Self::Fragment),
            _ => Err(ConfigError::InvalidValue {
                field: "range_strategy".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RangeStrategyChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Header => "header",
            Self::Fragment => "fragment",
        })
    }
}

/// What the host can do with a byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCapability {
    /// Ranges travel as a `Range` request header
    RangeHeader,
    /// Ranges travel as a `#_apk_range_...` URL fragment
    UrlFragment,
}

impl HostCapability {
    /// Resolve the capability from the configured choice and host version
    ///
    /// # Errors
    ///
    /// Returns an error if `version` is set but is not valid semver.
    pub fn detect(choice: RangeStrategyChoice, version: Option<&str>) -> Result<Self, Error> {
        match choice {
            RangeStrategyChoice::Header => Ok(Self::RangeHeader),
            RangeStrategyChoice::Fragment => Ok(Self::UrlFragment),
            RangeStrategyChoice::Auto => {
                let Some(version) = version else {
                    return Ok(Self::RangeHeader);
                };
                let version = semver::Version::parse(version.trim()).map_err(|e| {
                    ConfigError::InvalidValue {
                        field: "host.version".to_string(),
                        value: format!("{version}: {e}"),
                    }
                })?;
                // Pre-releases of the threshold version already carry the feature.
                let core = semver::Version::new(version.major, version.minor, version.patch);
                if core >= RANGE_HEADER_MIN_VERSION {
                    Ok(Self::RangeHeader)
                } else {
                    Ok(Self::UrlFragment)
                }
            }
        }
    }
}
