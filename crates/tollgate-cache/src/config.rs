//! Configuration for the TTL cache.

use std::time::Duration;

/// Default maximum number of entries before LRU eviction.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Default global TTL (none by default - entries don't expire).
pub const DEFAULT_TTL: Option<Duration> = None;

/// Configuration for the TTL cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries to hold before LRU eviction.
    pub max_entries: usize,

    /// Optional global time-to-live, measured from the last write.
    /// Individual writes may override this per key.
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl: DEFAULT_TTL,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of entries to hold.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Set the global write-TTL for entries.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Disable the global TTL (entries only leave via eviction or removal).
    pub fn without_ttl(mut self) -> Self {
        self.ttl = None;
        self
    }
}
