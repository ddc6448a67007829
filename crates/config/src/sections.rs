//! Configuration sections and their defaults

use crate::host::RangeStrategyChoice;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Upper bound on independent imports running at once
    #[serde(default = "default_parallel_imports")]
    pub parallel_imports: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            parallel_imports: default_parallel_imports(),
        }
    }
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    pub cache_root: Option<PathBuf>,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Host capability configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HostConfig {
    /// Version of the host tool driving the fetches (semver)
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub range_strategy: RangeStrategyChoice,
}

fn default_parallel_imports() -> usize {
    4
}

fn default_timeout() -> u64 {
    300 // 5 minutes
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("apkfetch/{}", env!("CARGO_PKG_VERSION"))
}
