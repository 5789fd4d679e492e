//! Session tracking over the TTL cache.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tollgate_cache::{CacheConfig, CacheStats, TtlCache};
use tracing::{debug, trace};

use crate::claims::{SessionKey, TokenClaims};
use crate::config::SessionConfig;

/// Entry tracked per live session.
///
/// `created_at` is the one mutable field: a renewal rewrites it to "now",
/// restarting the validity countdown. `issued_at` keeps the wall-clock time
/// of the original login for display.
#[derive(Debug, Clone)]
struct SessionEntry {
    created_at: Instant,
    issued_at: DateTime<Utc>,
}

/// Information about a live session for display.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Wall-clock time of the original login.
    pub issued_at: DateTime<Utc>,

    /// Time left until the session expires without renewal.
    pub remaining: Duration,
}

/// Tracks which issued tokens still have a live session.
///
/// Presence in the underlying cache is the sole source of truth: once an
/// entry's validity TTL elapses (or it is explicitly invalidated), the
/// session is gone no matter what the signed token itself says. Validity
/// checks never error; cache trouble degrades to "not valid".
///
/// Cloning the tracker shares the underlying session store.
#[derive(Clone)]
pub struct SessionTracker {
    sessions: TtlCache<SessionEntry>,
    config: SessionConfig,
}

impl SessionTracker {
    /// Create a new session tracker.
    pub fn new(config: SessionConfig) -> Self {
        let sessions = TtlCache::new(
            CacheConfig::new()
                .with_max_entries(config.max_sessions)
                .with_ttl(config.validity),
        );
        Self { sessions, config }
    }

    /// Get the tracker configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Derive the session key for a set of claims.
    ///
    /// Used both at issuance (via [`SessionTracker::record`]) and at
    /// verification time, where the same claims must map to the same key.
    pub fn session_key(&self, claims: &TokenClaims) -> SessionKey {
        SessionKey::derive(&self.config.key_prefix, claims)
    }

    /// Record a freshly issued session.
    ///
    /// Inserts or overwrites the entry and starts a fresh validity
    /// countdown. Returns the derived session key.
    pub async fn record(&self, claims: &TokenClaims) -> SessionKey {
        let key = self.session_key(claims);
        let entry = SessionEntry {
            created_at: Instant::now(),
            issued_at: Utc::now(),
        };

        self.sessions.insert(key.as_str(), entry).await;
        debug!(key = %key, "Session recorded");

        key
    }

    /// Check whether a session is currently valid.
    ///
    /// True iff an entry for the key is present and not yet expired. The
    /// check refreshes the entry's LRU recency (active sessions should not
    /// be capacity-evicted) but never its validity deadline.
    pub async fn is_valid(&self, key: &SessionKey) -> bool {
        self.sessions.get(key.as_str()).await.is_some()
    }

    /// Renew the session if it is inside the grace window before expiry.
    ///
    /// When less than the configured threshold remains, `created_at` is
    /// rewritten to "now" and the full validity is re-armed; otherwise this
    /// is a no-op, so steady traffic does not rewrite the entry on every
    /// request. Returns whether a renewal happened.
    ///
    /// Two renewals racing on the same key may lose one update; both
    /// outcomes leave a freshly extended session, so no coordination is
    /// needed beyond the cache's own locking.
    pub async fn renew_if_near(&self, key: &SessionKey) -> bool {
        let Some(entry) = self.sessions.peek(key.as_str()).await else {
            return false;
        };

        let expire_at = entry.created_at + self.config.validity;
        let remaining = expire_at.saturating_duration_since(Instant::now());
        if remaining > self.config.renew_threshold {
            trace!(key = %key, remaining_secs = remaining.as_secs(), "Session not near expiry");
            return false;
        }

        let renewed = SessionEntry {
            created_at: Instant::now(),
            issued_at: entry.issued_at,
        };
        self.sessions.insert(key.as_str(), renewed).await;

        debug!(key = %key, "Session renewed");
        true
    }

    /// Explicitly invalidate one session (logout).
    pub async fn invalidate(&self, key: &SessionKey) -> bool {
        let removed = self.sessions.remove(key.as_str()).await.is_some();
        if removed {
            debug!(key = %key, "Session invalidated");
        }
        removed
    }

    /// Invalidate every session of one subject (force logout).
    ///
    /// Returns the number of sessions dropped.
    pub async fn invalidate_subject(&self, subject: &str) -> usize {
        let prefix = format!("{}{}:", self.config.key_prefix, subject);
        let removed = self.sessions.remove_prefix(&prefix).await;
        if removed > 0 {
            debug!(subject = %subject, count = removed, "Subject sessions invalidated");
        }
        removed
    }

    /// List the keys of all live sessions.
    pub async fn active_sessions(&self) -> Vec<SessionKey> {
        self.sessions
            .keys_with_prefix(&self.config.key_prefix)
            .await
            .into_iter()
            .map(SessionKey::from_raw)
            .collect()
    }

    /// Get display information for a live session.
    pub async fn session_info(&self, key: &SessionKey) -> Option<SessionInfo> {
        let entry = self.sessions.peek(key.as_str()).await?;
        let expire_at = entry.created_at + self.config.validity;

        Some(SessionInfo {
            issued_at: entry.issued_at,
            remaining: expire_at.saturating_duration_since(Instant::now()),
        })
    }

    /// Physically reclaim expired sessions.
    pub async fn cleanup_expired(&self) -> usize {
        self.sessions.cleanup_expired().await
    }

    /// Get statistics for the underlying session store.
    pub async fn stats(&self) -> CacheStats {
        self.sessions.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::mint_login_id;
    use tokio::time::sleep;

    fn tracker(validity_ms: u64, threshold_ms: u64) -> SessionTracker {
        SessionTracker::new(
            SessionConfig::new()
                .with_validity(Duration::from_millis(validity_ms))
                .with_renew_threshold(Duration::from_millis(threshold_ms)),
        )
    }

    fn claims(subject: &str) -> TokenClaims {
        TokenClaims::new(subject, mint_login_id()).unwrap()
    }

    #[tokio::test]
    async fn test_record_then_valid() {
        let tracker = tracker(60_000, 1_000);
        let key = tracker.record(&claims("alice")).await;

        assert!(tracker.is_valid(&key).await);
    }

    #[tokio::test]
    async fn test_unknown_key_invalid() {
        let tracker = tracker(60_000, 1_000);
        let key = SessionKey::from_raw("online-token:ghost:deadbeef");

        assert!(!tracker.is_valid(&key).await);
    }

    #[tokio::test]
    async fn test_expires_without_renewal() {
        let tracker = tracker(50, 10);
        let key = tracker.record(&claims("alice")).await;

        sleep(Duration::from_millis(100)).await;

        assert!(!tracker.is_valid(&key).await);
    }

    #[tokio::test]
    async fn test_validity_checks_do_not_extend() {
        let tracker = tracker(100, 10);
        let key = tracker.record(&claims("alice")).await;

        sleep(Duration::from_millis(60)).await;
        assert!(tracker.is_valid(&key).await);

        // Checking validity must not have pushed the deadline out
        sleep(Duration::from_millis(60)).await;
        assert!(!tracker.is_valid(&key).await);
    }

    #[tokio::test]
    async fn test_renew_outside_grace_is_noop() {
        // 150ms validity, renew only within the last 20ms
        let tracker = tracker(150, 20);
        let key = tracker.record(&claims("alice")).await;

        sleep(Duration::from_millis(30)).await;

        assert!(!tracker.renew_if_near(&key).await);
        assert!(tracker.is_valid(&key).await);

        // The no-op did not extend the session past its original expiry
        sleep(Duration::from_millis(150)).await;
        assert!(!tracker.is_valid(&key).await);
    }

    #[tokio::test]
    async fn test_renew_inside_grace_extends() {
        // 150ms validity, renew within the last 100ms
        let tracker = tracker(150, 100);
        let key = tracker.record(&claims("alice")).await;

        sleep(Duration::from_millis(80)).await;
        assert!(tracker.renew_if_near(&key).await);

        // Past the original expiry, but alive thanks to the renewal
        sleep(Duration::from_millis(100)).await;
        assert!(tracker.is_valid(&key).await);
    }

    #[tokio::test]
    async fn test_renew_preserves_issued_at() {
        let tracker = tracker(150, 150);
        let key = tracker.record(&claims("alice")).await;

        let before = tracker.session_info(&key).await.unwrap();
        sleep(Duration::from_millis(30)).await;

        assert!(tracker.renew_if_near(&key).await);

        let after = tracker.session_info(&key).await.unwrap();
        assert_eq!(before.issued_at, after.issued_at);
    }

    #[tokio::test]
    async fn test_renew_missing_session() {
        let tracker = tracker(60_000, 1_000);
        let key = SessionKey::from_raw("online-token:ghost:deadbeef");

        assert!(!tracker.renew_if_near(&key).await);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let tracker = tracker(60_000, 1_000);
        let key = tracker.record(&claims("alice")).await;

        assert!(tracker.invalidate(&key).await);
        assert!(!tracker.is_valid(&key).await);
        assert!(!tracker.invalidate(&key).await);
    }

    #[tokio::test]
    async fn test_invalidate_subject() {
        let tracker = tracker(60_000, 1_000);

        // Two logins for alice, one for bob
        let alice_1 = tracker.record(&claims("alice")).await;
        let alice_2 = tracker.record(&claims("alice")).await;
        let bob = tracker.record(&claims("bob")).await;

        assert_eq!(tracker.invalidate_subject("alice").await, 2);
        assert!(!tracker.is_valid(&alice_1).await);
        assert!(!tracker.is_valid(&alice_2).await);
        assert!(tracker.is_valid(&bob).await);
    }

    #[tokio::test]
    async fn test_active_sessions() {
        let tracker = tracker(60_000, 1_000);

        let alice = tracker.record(&claims("alice")).await;
        let bob = tracker.record(&claims("bob")).await;

        let active = tracker.active_sessions().await;
        assert_eq!(active.len(), 2);
        assert!(active.contains(&alice));
        assert!(active.contains(&bob));
    }

    #[tokio::test]
    async fn test_same_claims_same_key() {
        let tracker = tracker(60_000, 1_000);
        let claims = claims("alice");

        let recorded = tracker.record(&claims).await;

        // Verification-time derivation from the same claims finds the session
        let derived = tracker.session_key(&claims);
        assert_eq!(recorded, derived);
        assert!(tracker.is_valid(&derived).await);
    }

    #[tokio::test]
    async fn test_session_info_remaining() {
        let tracker = tracker(60_000, 1_000);
        let key = tracker.record(&claims("alice")).await;

        let info = tracker.session_info(&key).await.unwrap();
        assert!(info.remaining <= Duration::from_millis(60_000));
        assert!(info.remaining > Duration::from_millis(50_000));
    }

    #[tokio::test]
    async fn test_record_overwrites_restarts_countdown() {
        let tracker = tracker(100, 10);
        let claims = claims("alice");

        let key = tracker.record(&claims).await;
        sleep(Duration::from_millis(60)).await;

        // Re-login with the same claims restarts the countdown
        tracker.record(&claims).await;
        sleep(Duration::from_millis(60)).await;

        assert!(tracker.is_valid(&key).await);
    }

    #[tokio::test]
    async fn test_stats() {
        let tracker = tracker(60_000, 1_000);
        tracker.record(&claims("alice")).await;
        tracker.record(&claims("bob")).await;

        let stats = tracker.stats().await;
        assert_eq!(stats.size, 2);
        assert_eq!(stats.ttl_tracked, 2);
    }
}
