//! Environment variable names and fixed thresholds

/// Credential descriptor, `basic:REALM:USER:PASSWORD`
pub const HTTP_AUTH: &str = "HTTP_AUTH";

pub const ENV_CACHE_ROOT: &str = "APKFETCH_CACHE_ROOT";
pub const ENV_PARALLEL_IMPORTS: &str = "APKFETCH_PARALLEL_IMPORTS";
pub const ENV_HOST_VERSION: &str = "APKFETCH_HOST_VERSION";
pub const ENV_RANGE_STRATEGY: &str = "APKFETCH_RANGE_STRATEGY";

/// First host tool version that can attach a `Range` header to a fetch
pub const RANGE_HEADER_MIN_VERSION: semver::Version = semver::Version::new(7, 1, 0);
