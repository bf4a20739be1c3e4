//! Configuration file handling
//!
//! Settings come from an optional TOML file (`--config PATH`, or
//! `config.toml` in the platform config directory) and are then overridden by
//! command-line arguments. Every field has a default, so an absent file or an
//! empty one is valid; only the API key must come from somewhere.
//!
//! ```toml
//! [api]
//! key = "0123456789abcdef"
//!
//! [cache]
//! enabled = true
//! weather_ttl_minutes = 10
//! forecast_ttl_minutes = 60
//!
//! [log]
//! level = "debug"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::cli::Cli;
use crate::data::location::DEFAULT_LOCATION_URL;
use crate::data::openweather::{CacheTtl, DEFAULT_FORECAST_URL, DEFAULT_WEATHER_URL};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("No OpenWeatherMap API key: pass --api-key, set OPENWEATHER_API_KEY, or add [api] key to the config file")]
    MissingApiKey,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub log: LogConfig,
}

/// Endpoints and credentials
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub key: Option<String>,
    pub weather_url: String,
    pub forecast_url: String,
    pub location_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            location_url: DEFAULT_LOCATION_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub weather_ttl_minutes: u64,
    pub forecast_ttl_minutes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let ttl = CacheTtl::default();
        Self {
            enabled: true,
            weather_ttl_minutes: ttl.weather_minutes,
            forecast_ttl_minutes: ttl.forecast_minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive, e.g. "info" or "weatherdash=debug"; RUST_LOG wins
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// `config.toml` in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME).map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from `explicit`, or from the default location
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies command-line overrides
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(key) = &cli.api_key {
            self.api.key = Some(key.clone());
        }
        if cli.no_cache {
            self.cache.enabled = false;
        }
    }

    /// The API key, if set and not blank
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api
            .key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn cache_ttl(&self) -> CacheTtl {
        CacheTtl {
            weather_minutes: self.cache.weather_ttl_minutes,
            forecast_minutes: self.cache.forecast_ttl_minutes,
        }
    }
}
