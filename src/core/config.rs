//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::errors::{HecError, Result};

/// Minimum polling period accepted from configuration or flags.
pub const MIN_POLL_INTERVAL_MS: u64 = 250;
/// Largest feed window the client will ask for.
pub const MAX_FEED_LIMIT: usize = 500;

/// Full overseer configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub sync: SyncConfig,
    pub paths: PathsConfig,
}

/// Where the simulation backend lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

/// Polling cadence and feed window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SyncConfig {
    pub poll_interval_ms: u64,
    pub feed_limit: usize,
}

/// Filesystem paths used by the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub activity_log: PathBuf,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_ms: 5_000,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2_000,
            feed_limit: 20,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!(
                    "[HEC-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths"
                );
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        Self {
            config_file: home_dir
                .join(".config")
                .join("hec-overseer")
                .join("config.toml"),
            activity_log: home_dir
                .join(".local")
                .join("share")
                .join("hec-overseer")
                .join("activity.jsonl"),
        }
    }
}

impl BackendConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl SyncConfig {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| HecError::Io {
                path: path_buf.clone(),
                source,
            })?;
            toml::from_str::<Self>(&raw)?
        } else if path.is_some() {
            return Err(HecError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Replace the backend address and re-validate.
    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        self.backend.base_url = url.to_string();
        self.normalize();
        self.validate()
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("HEC_BACKEND_URL") {
            self.backend.base_url = raw;
        }
        if let Some(raw) = lookup("HEC_REQUEST_TIMEOUT_MS") {
            self.backend.request_timeout_ms = parse_env("HEC_REQUEST_TIMEOUT_MS", &raw)?;
        }
        if let Some(raw) = lookup("HEC_POLL_INTERVAL_MS") {
            self.sync.poll_interval_ms = parse_env("HEC_POLL_INTERVAL_MS", &raw)?;
        }
        if let Some(raw) = lookup("HEC_FEED_LIMIT") {
            self.sync.feed_limit = parse_env("HEC_FEED_LIMIT", &raw)?;
        }
        if let Some(raw) = lookup("HEC_ACTIVITY_LOG") {
            self.paths.activity_log = PathBuf::from(raw);
        }
        Ok(())
    }

    fn normalize(&mut self) {
        let trimmed = self.backend.base_url.trim().trim_end_matches('/');
        self.backend.base_url = trimmed.to_string();
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        let url = &self.backend.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(HecError::InvalidConfig {
                details: format!("backend.base_url must use http:// or https://, got {url:?}"),
            });
        }
        if self.backend.request_timeout_ms == 0 {
            return Err(HecError::InvalidConfig {
                details: "backend.request_timeout_ms must be greater than 0".to_string(),
            });
        }
        if self.sync.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(HecError::InvalidConfig {
                details: format!(
                    "sync.poll_interval_ms must be at least {MIN_POLL_INTERVAL_MS}, got {}",
                    self.sync.poll_interval_ms
                ),
            });
        }
        if !(1..=MAX_FEED_LIMIT).contains(&self.sync.feed_limit) {
            return Err(HecError::InvalidConfig {
                details: format!(
                    "sync.feed_limit must be in [1,{MAX_FEED_LIMIT}], got {}",
                    self.sync.feed_limit
                ),
            });
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|error| HecError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}
