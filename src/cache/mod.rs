//! Disk cache for API responses
//!
//! Entries carry a TTL in minutes. Expired entries stay readable with an
//! `is_expired` flag so the dashboard can fall back to them when the API is
//! unreachable.

mod manager;

pub use manager::{CacheManager, CachedData};
