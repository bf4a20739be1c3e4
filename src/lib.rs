//! Weather Dashboard Library
//!
//! Current weather and a 5-day local-noon temperature chart in the terminal.
//! The binary wires these modules together; integration tests use them directly.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod daily;
pub mod data;
pub mod logging;
pub mod ui;

/// Name used for the config, cache and log directories
pub const APP_NAME: &str = "weatherdash";
