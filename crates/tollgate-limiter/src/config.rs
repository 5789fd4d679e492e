//! Rate limit rules and limiter configuration.

use std::net::IpAddr;
use std::time::Duration;

/// Default maximum number of live counters.
pub const DEFAULT_MAX_COUNTERS: usize = 10_000;

/// How the subject of a rate-limit key is chosen when no explicit key is
/// configured on the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LimitKind {
    /// Key on the protected operation's name.
    #[default]
    Subject,
    /// Key on the caller's IP address.
    CallerIp,
}

/// A rate-limit rule for one protected operation.
#[derive(Debug, Clone)]
pub struct LimitRule {
    /// Rule identifier, used as the key prefix.
    pub id: String,

    /// Human-readable label for log records.
    pub label: String,

    /// Explicit subject key. When empty the subject is derived from the
    /// request per [`LimitKind`].
    pub key: Option<String>,

    /// Subject derivation when no explicit key is set.
    pub kind: LimitKind,

    /// Maximum allowed requests per window (inclusive).
    pub ceiling: u64,

    /// Length of the fixed counting window.
    pub window: Duration,
}

impl LimitRule {
    /// Create a rule keyed on the operation name.
    pub fn new(id: impl Into<String>, ceiling: u64, window: Duration) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            key: None,
            kind: LimitKind::Subject,
            ceiling,
            window,
        }
    }

    /// Create a rule keyed on the caller's IP address.
    pub fn per_ip(id: impl Into<String>, ceiling: u64, window: Duration) -> Self {
        Self {
            kind: LimitKind::CallerIp,
            ..Self::new(id, ceiling, window)
        }
    }

    /// Set the human-readable label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set an explicit subject key, overriding [`LimitKind`] derivation.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Ambient request state, passed explicitly into every check.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    /// Caller's IP address.
    pub caller_ip: IpAddr,

    /// Request path of the protected operation.
    pub path: String,

    /// Name of the protected operation.
    pub operation: String,
}

impl RequestInfo {
    /// Create request info for one inbound call.
    pub fn new(caller_ip: IpAddr, path: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            caller_ip,
            path: path.into(),
            operation: operation.into(),
        }
    }
}

/// Configuration for the rate limiter.
#[derive(Debug, Clone)]
pub struct LimiterConfig {
    /// Maximum number of live counters before LRU eviction.
    pub max_counters: usize,

    /// Enable rate limiting. A disabled limiter allows everything without
    /// touching counters.
    pub enabled: bool,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            max_counters: DEFAULT_MAX_COUNTERS,
            enabled: true,
        }
    }
}

impl LimiterConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of live counters.
    pub fn with_max_counters(mut self, max: usize) -> Self {
        self.max_counters = max;
        self
    }

    /// Enable or disable rate limiting.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_defaults() {
        let rule = LimitRule::new("login", 3, Duration::from_secs(60));
        assert_eq!(rule.id, "login");
        assert_eq!(rule.label, "login");
        assert_eq!(rule.key, None);
        assert_eq!(rule.kind, LimitKind::Subject);
    }

    #[test]
    fn test_per_ip_rule() {
        let rule = LimitRule::per_ip("login", 3, Duration::from_secs(60))
            .with_label("login attempts");
        assert_eq!(rule.kind, LimitKind::CallerIp);
        assert_eq!(rule.label, "login attempts");
    }

    #[test]
    fn test_limiter_config_default() {
        let config = LimiterConfig::default();
        assert_eq!(config.max_counters, DEFAULT_MAX_COUNTERS);
        assert!(config.enabled);
    }
}
