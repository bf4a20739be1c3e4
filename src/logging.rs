//! Log output
//!
//! The terminal is in raw mode on the alternate screen while the dashboard
//! runs, so logs go to a file in the platform data directory
//! (`~/.local/share/weatherdash/weatherdash.log` on Linux).

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "weatherdash.log";

/// Installs the global subscriber writing to the default log file
///
/// Returns the log file path, or `None` if logging could not be set up.
pub fn init(level: &str) -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", crate::APP_NAME)?;
    init_in(dirs.data_local_dir(), level)
}

/// Installs the global subscriber writing to `dir/weatherdash.log`
///
/// `RUST_LOG`, when set, takes precedence over `level`.
pub fn init_in(dir: &Path, level: &str) -> Option<PathBuf> {
    fs::create_dir_all(dir).ok()?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .ok()?;

    Some(path)
}
