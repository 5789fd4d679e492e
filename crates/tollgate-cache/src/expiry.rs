//! Write-time expiry tracking.
//!
//! Deadlines are armed when an entry is written and are never refreshed by
//! reads. This keeps rate-limit windows from being extended by the very
//! traffic they are limiting.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Tracks absolute expiry deadlines for cache keys.
#[derive(Debug)]
pub struct ExpiryTracker {
    /// Absolute deadline for each key.
    deadlines: HashMap<String, Instant>,

    /// Default TTL applied on writes (None means no expiration).
    default_ttl: Option<Duration>,
}

impl ExpiryTracker {
    /// Create a new tracker with the given default TTL.
    pub fn new(default_ttl: Option<Duration>) -> Self {
        Self {
            deadlines: HashMap::new(),
            default_ttl,
        }
    }

    /// Arm the deadline for a key from now.
    ///
    /// An explicit `ttl` overrides the default for this key. With neither
    /// an explicit nor a default TTL the key never expires.
    pub fn arm(&mut self, key: &str, ttl: Option<Duration>) {
        match ttl.or(self.default_ttl) {
            Some(ttl) => {
                self.deadlines.insert(key.to_string(), Instant::now() + ttl);
            }
            None => {
                self.deadlines.remove(key);
            }
        }
    }

    /// Check if a key's deadline has passed.
    pub fn is_expired(&self, key: &str) -> bool {
        match self.deadlines.get(key) {
            Some(deadline) => Instant::now() >= *deadline,
            // No deadline record: never expires unless a default TTL is in
            // force, in which case an untracked key counts as expired.
            None => self.default_ttl.is_some(),
        }
    }

    /// Remove tracking for a key.
    pub fn remove(&mut self, key: &str) {
        self.deadlines.remove(key);
    }

    /// Get all keys whose deadline has passed.
    pub fn expired_keys(&self) -> Vec<String> {
        let now = Instant::now();
        self.deadlines
            .iter()
            .filter(|(_, deadline)| now >= **deadline)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Remove all expired entries and return their keys.
    pub fn drain_expired(&mut self) -> Vec<String> {
        let expired = self.expired_keys();
        for key in &expired {
            self.deadlines.remove(key);
        }
        expired
    }

    /// Get the number of tracked keys.
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    /// Check if there are no tracked keys.
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    /// Clear all tracking data.
    pub fn clear(&mut self) {
        self.deadlines.clear();
    }

    /// Get the configured default TTL.
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }
}
