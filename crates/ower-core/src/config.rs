//! Configuration for the profile cache and upstream endpoints.
//!
//! Configuration is stored in TOML and resolved in this order:
//!
//! 1. The file named by `OWER_CONFIG`, when set
//! 2. `config.toml` in the platform config directory
//! 3. Built-in defaults
//!
//! `OWER_DATA_DIR` overrides the cache directory regardless of where the rest of
//! the configuration came from.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [cache]
//! dir = "/var/cache/ower"
//! ttl_hours = 12
//! cleanup_interval_hours = 24
//!
//! [source]
//! data_source = "https://overwatch.blizzard.com/en-us/career/"
//! name_search = "https://overwatch.blizzard.com/en-us/search/account-by-name/"
//! timeout_secs = 30
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::catalog::HeroCatalog;
use crate::{Error, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "OWER_CONFIG";
/// Environment variable overriding the cache directory.
pub const DATA_DIR_ENV: &str = "OWER_DATA_DIR";

/// Upper bound for `ttl_hours` and `cleanup_interval_hours` (ten years).
pub const MAX_SCHEDULE_HOURS: u64 = 24 * 365 * 10;
/// Upper bound for `timeout_secs`.
pub const MAX_TIMEOUT_SECS: u64 = 3600;

const DEFAULT_DATA_SOURCE: &str = "https://overwatch.blizzard.com/en-us/career/";
const DEFAULT_NAME_SEARCH: &str = "https://overwatch.blizzard.com/en-us/search/account-by-name/";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Cache location and expiry policy
    pub cache: CacheConfig,
    /// Upstream endpoints
    pub source: SourceConfig,
}

/// Cache location and expiry policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding one `<encoded-tag>.html` file per player.
    pub dir: PathBuf,

    /// Age after which an entry becomes eligible for cleanup.
    ///
    /// Reads never check this value; only the cleanup sweep does.
    pub ttl_hours: u64,

    /// How often the cleanup sweep runs when driven by the interval trigger.
    pub cleanup_interval_hours: u64,
}

/// Upstream endpoints and HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Career page base URL; the percent-encoded tag is appended.
    pub data_source: String,
    /// Account search base URL used to canonicalize player names.
    pub name_search: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// JSON hero catalog replacing the built-in roster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heroes_file: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            ttl_hours: 12,
            cleanup_interval_hours: 24,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            name_search: DEFAULT_NAME_SEARCH.to_string(),
            timeout_secs: 30,
            heroes_file: None,
        }
    }
}

impl CacheConfig {
    /// Entry time-to-live as a [`Duration`].
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours.saturating_mul(3600))
    }

    /// Cleanup period as a [`Duration`].
    #[must_use]
    pub const fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_hours.saturating_mul(3600))
    }
}

impl SourceConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from `OWER_CONFIG`, the platform config file, or defaults.
    ///
    /// A missing file yields defaults; an unreadable or malformed one is an error.
    pub fn load() -> Result<Self> {
        let path = match std::env::var(CONFIG_ENV) {
            Ok(explicit) if !explicit.trim().is_empty() => Some(PathBuf::from(explicit.trim())),
            _ => Self::default_path(),
        };

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text. Missing sections fall back to defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// The hero catalog named by `source.heroes_file`, else the built-in roster.
    pub fn hero_catalog(&self) -> Result<HeroCatalog> {
        self.source
            .heroes_file
            .as_deref()
            .map_or_else(|| Ok(HeroCatalog::builtin().clone()), HeroCatalog::from_file)
    }

    /// Location of the platform config file, if a home directory can be determined.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "kindyear", "ower")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                self.cache.dir = PathBuf::from(trimmed);
            }
        }
    }

    /// Reject settings the cache and fetcher cannot work with.
    pub fn validate(&self) -> Result<()> {
        for (field, value, max) in [
            ("cache.ttl_hours", self.cache.ttl_hours, MAX_SCHEDULE_HOURS),
            (
                "cache.cleanup_interval_hours",
                self.cache.cleanup_interval_hours,
                MAX_SCHEDULE_HOURS,
            ),
            ("source.timeout_secs", self.source.timeout_secs, MAX_TIMEOUT_SECS),
        ] {
            if !(1..=max).contains(&value) {
                return Err(Error::Config(format!(
                    "{field} must be between 1 and {max}, got {value}"
                )));
            }
        }
        for (field, value) in [
            ("source.data_source", &self.source.data_source),
            ("source.name_search", &self.source.name_search),
        ] {
            Url::parse(value).map_err(|e| Error::Config(format!("{field} '{value}': {e}")))?;
        }
        Ok(())
    }
}

fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("dev", "kindyear", "ower").map_or_else(
        || PathBuf::from(".ower/cache"),
        |dirs| dirs.cache_dir().join("profiles"),
    )
}
