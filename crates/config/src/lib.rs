#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for apkfetch
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/apkfetch/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)
//!
//! The environment is only read by [`Config::merge_env`]; everything
//! downstream receives plain values.

pub mod constants;
pub mod sections;
pub mod host;

pub use sections::{GeneralConfig, HostConfig, NetworkConfig, PathConfig};
pub use host::{HostCapability, RangeStrategyChoice};

use apkfetch_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub host: HostConfig,

    /// Raw `HTTP_AUTH` descriptor; never persisted
    #[serde(skip)]
    pub http_auth: Option<String>,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("apkfetch").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the default configuration file exists but cannot
    /// be read or parsed.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading configuration");
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an invalid value.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Merge with variables supplied by `lookup`
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn merge_env_from<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(constants::ENV_CACHE_ROOT) {
            self.paths.cache_root = Some(PathBuf::from(root));
        }

        if let Some(parallel) = lookup(constants::ENV_PARALLEL_IMPORTS) {
            self.general.parallel_imports =
                parallel.parse().map_err(|_| ConfigError::InvalidValue {
                    field: constants::ENV_PARALLEL_IMPORTS.to_string(),
                    value: parallel,
                })?;
        }

        if let Some(version) = lookup(constants::ENV_HOST_VERSION) {
            self.host.version = Some(version);
        }

        if let Some(strategy) = lookup(constants::ENV_RANGE_STRATEGY) {
            self.host.range_strategy = strategy.parse()?;
        }

        if let Some(auth) = lookup(constants::HTTP_AUTH) {
            if !auth.is_empty() {
                self.http_auth = Some(auth);
            }
        }

        Ok(())
    }

    /// Get the cache root (with default)
    #[must_use]
    pub fn cache_root(&self) -> PathBuf {
        self.paths.cache_root.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("apkfetch")
        })
    }

    /// Resolve the host capability once for this invocation
    ///
    /// # Errors
    ///
    /// Returns an error if the configured host version is not valid semver.
    pub fn host_capability(&self) -> Result<HostCapability, Error> {
        HostCapability::detect(self.host.range_strategy, self.host.version.as_deref())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.network.connect_timeout)
    }

    /// Parallelism for independent imports, never below one
    #[must_use]
    pub fn parallel_imports(&self) -> usize {
        self.general.parallel_imports.max(1)
    }
}
