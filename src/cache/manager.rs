//! Cache manager for persisting API responses to disk
//!
//! Provides a `CacheManager` that stores serializable data to JSON files with
//! expiry timestamps, so a dashboard can still show the last known weather
//! when the API cannot be reached.

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Wrapper struct for cached data stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Result of reading from cache, including metadata about cache freshness
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
    /// Whether the cache entry has expired
    pub is_expired: bool,
}

/// Manages reading and writing cached data to disk
///
/// Entries live as `<key>.json` in an XDG-compliant cache directory
/// (`~/.cache/weatherdash/` on Linux). Expired entries are still returned,
/// flagged with `is_expired = true`.
#[derive(Debug, Clone)]
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a CacheManager in the platform cache directory
    ///
    /// Returns `None` if no home directory can be determined.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", crate::APP_NAME)?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a CacheManager rooted at `cache_dir`
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Writes `data` under `key`, fresh for `ttl_minutes`
    ///
    /// Creates the cache directory when missing.
    pub fn write<T: Serialize>(&self, key: &str, data: &T, ttl_minutes: u64) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)?;

        let now = Utc::now();
        let ttl = i64::try_from(ttl_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .unwrap_or(Duration::MAX);
        let entry = CacheEntry {
            data,
            cached_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        fs::write(self.cache_path(key), json)
    }

    /// Reads the entry stored under `key`
    ///
    /// Returns `None` if the entry does not exist or cannot be parsed as `T`.
    /// An expired entry is returned with `is_expired = true`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        let content = fs::read_to_string(self.cache_path(key)).ok()?;
        let entry: CacheEntry<T> = serde_json::from_str(&content).ok()?;

        Some(CachedData {
            data: entry.data,
            cached_at: entry.cached_at,
            is_expired: Utc::now() > entry.expires_at,
        })
    }
}
