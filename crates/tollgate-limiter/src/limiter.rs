//! Fixed-window rate limiter over the TTL counter cache.

use std::future::Future;

use tollgate_cache::{CacheConfig, CacheStats, TtlCache};
use tracing::{debug, warn};

use crate::config::{LimitRule, LimiterConfig, RequestInfo};
use crate::error::{Error, Result};
use crate::key::derive_key;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The call is within the ceiling. Carries the post-increment count
    /// (0 when the limiter is disabled).
    Allowed { count: u64 },
    /// The call exceeded the ceiling inside the current window.
    Rejected { count: u64 },
}

impl Decision {
    /// Check if the call was allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }

    /// The post-increment counter value behind this decision.
    pub fn count(&self) -> u64 {
        match self {
            Decision::Allowed { count } | Decision::Rejected { count } => *count,
        }
    }
}

/// Fixed-window rate limiter.
///
/// Each (rule, subject, path) key owns a counter whose TTL is armed to the
/// rule's window on the first increment. When the window elapses the counter
/// becomes unobservable and the next check starts a fresh window at 1.
/// The ceiling is inclusive: the N-th request where N equals the ceiling is
/// still allowed, the (N+1)-th inside the same window is rejected.
///
/// Counters live in a bounded LRU cache owned by this limiter; cloning the
/// limiter shares the underlying counters.
#[derive(Clone)]
pub struct RateLimiter {
    counters: TtlCache<u64>,
    config: LimiterConfig,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(LimiterConfig::default())
    }
}

impl RateLimiter {
    /// Create a new rate limiter.
    pub fn new(config: LimiterConfig) -> Self {
        let counters = TtlCache::new(CacheConfig::new().with_max_entries(config.max_counters));
        Self { counters, config }
    }

    /// Get the limiter configuration.
    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    /// Check a request against a rule, incrementing its window counter.
    ///
    /// The look-up-or-create, window arming, and increment happen as one
    /// atomic unit per key: concurrent callers on a brand-new key share one
    /// counter and arm its window exactly once. Every check emits a log
    /// record with the count, key, and rule label; logging never affects
    /// the decision.
    pub async fn check(&self, rule: &LimitRule, request: &RequestInfo) -> Decision {
        if !self.config.enabled {
            return Decision::Allowed { count: 0 };
        }

        let key = derive_key(rule, request);
        let count = self
            .counters
            .upsert_with(&key, Some(rule.window), || 0u64, |count, _| {
                *count += 1;
                *count
            })
            .await;

        debug!(
            count = count,
            key = %key,
            label = %rule.label,
            "Rate limit check"
        );

        if count <= rule.ceiling {
            Decision::Allowed { count }
        } else {
            warn!(
                count = count,
                key = %key,
                label = %rule.label,
                ceiling = rule.ceiling,
                "Rate limit exceeded"
            );
            Decision::Rejected { count }
        }
    }

    /// Check a request and turn a rejection into [`Error::RateLimited`].
    ///
    /// Returns the post-increment count on allow.
    pub async fn enforce(&self, rule: &LimitRule, request: &RequestInfo) -> Result<u64> {
        match self.check(rule, request).await {
            Decision::Allowed { count } => Ok(count),
            Decision::Rejected { count } => Err(Error::RateLimited {
                label: rule.label.clone(),
                count,
                ceiling: rule.ceiling,
            }),
        }
    }

    /// Run a protected operation under a rule.
    ///
    /// The operation runs only when the check allows it; on rejection it is
    /// never polled and [`Error::RateLimited`] is returned instead.
    pub async fn with_rate_limit<T>(
        &self,
        rule: &LimitRule,
        request: &RequestInfo,
        op: impl Future<Output = T>,
    ) -> Result<T> {
        self.enforce(rule, request).await?;
        Ok(op.await)
    }

    /// Drop the counter for one (rule, request) key, restarting its window.
    pub async fn reset(&self, rule: &LimitRule, request: &RequestInfo) -> bool {
        let key = derive_key(rule, request);
        self.counters.remove(&key).await.is_some()
    }

    /// Physically reclaim counters whose window has elapsed.
    pub async fn cleanup_expired(&self) -> usize {
        self.counters.cleanup_expired().await
    }

    /// Get statistics for the underlying counter cache.
    pub async fn stats(&self) -> CacheStats {
        self.counters.stats().await
    }
}
