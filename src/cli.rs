//! Command-line interface parsing for the weather dashboard
//!
//! This module handles parsing of CLI arguments using clap: an optional
//! startup city, the API key, the config file path and cache control.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The city argument was given but blank
    #[error("Please enter a city name.")]
    EmptyCity,
}

/// Weather Dashboard - current weather and a 5-day temperature chart
#[derive(Parser, Debug)]
#[command(name = "weatherdash")]
#[command(about = "Current weather and a 5-day local-noon temperature chart")]
#[command(version)]
pub struct Cli {
    /// City to show on startup; detected from your IP address when omitted
    ///
    /// Examples:
    ///   weatherdash              # Auto-detect city
    ///   weatherdash London       # Start with London
    ///   weatherdash "New York"   # Multi-word city names need quotes
    #[arg(value_name = "CITY")]
    pub city: Option<String>,

    /// OpenWeatherMap API key
    #[arg(long, value_name = "KEY", env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Path to a TOML config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Neither read nor write the response cache
    #[arg(long)]
    pub no_cache: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupConfig {
    /// City to load first; `None` means auto-detect
    pub initial_city: Option<String>,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with the trimmed city, if any
    /// * `Err(CliError::EmptyCity)` if a blank city was passed
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        match cli.city.as_deref().map(str::trim) {
            None => Ok(StartupConfig::default()),
            Some("") => Err(CliError::EmptyCity),
            Some(city) => Ok(StartupConfig {
                initial_city: Some(city.to_string()),
            }),
        }
    }
}
