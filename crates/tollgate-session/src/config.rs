//! Configuration for the session tracker.

use std::time::Duration;

/// Default session key prefix.
pub const DEFAULT_KEY_PREFIX: &str = "online-token:";

/// Default session validity (2 hours).
pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(2 * 60 * 60);

/// Default renewal detection threshold (30 minutes).
pub const DEFAULT_RENEW_THRESHOLD: Duration = Duration::from_secs(30 * 60);

/// Default maximum number of tracked sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Configuration for the session tracker.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Prefix for derived session keys.
    pub key_prefix: String,

    /// How long a session stays valid after its last recording or renewal.
    pub validity: Duration,

    /// Trailing portion of the validity window during which a touch renews
    /// the session instead of letting it lapse.
    pub renew_threshold: Duration,

    /// Maximum number of sessions to track before LRU eviction.
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            validity: DEFAULT_VALIDITY,
            renew_threshold: DEFAULT_RENEW_THRESHOLD,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl SessionConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the session validity duration.
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    /// Set the renewal detection threshold.
    pub fn with_renew_threshold(mut self, threshold: Duration) -> Self {
        self.renew_threshold = threshold;
        self
    }

    /// Set the maximum number of tracked sessions.
    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = max;
        self
    }
}
