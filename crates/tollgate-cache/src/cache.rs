//! TTL-bounded cache with LRU eviction.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use lru::LruCache;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::expiry::ExpiryTracker;

/// Inner state protected by RwLock.
struct CacheInner<V> {
    /// LRU cache of entries.
    lru: LruCache<String, V>,

    /// Expiry tracker with write-time deadlines.
    expiry: ExpiryTracker,
}

/// TTL-bounded cache with LRU eviction.
///
/// This cache provides:
/// - LRU eviction when max capacity is reached
/// - Write-time expiry: a deadline armed per write, never renewed by reads
/// - A global default TTL with optional per-key overrides
/// - An atomic get-or-create-then-mutate operation
/// - Thread-safe access via RwLock
///
/// Values stored in the cache are owned by it: callers receive clones and
/// all mutation goes through [`TtlCache::upsert_with`].
pub struct TtlCache<V> {
    inner: Arc<RwLock<CacheInner<V>>>,
    config: CacheConfig,
}

impl<V: Clone> TtlCache<V> {
    /// Create a new cache from a configuration.
    pub fn new(config: CacheConfig) -> Self {
        let cap =
            NonZeroUsize::new(config.max_entries).unwrap_or_else(|| NonZeroUsize::new(1).unwrap());

        let inner = CacheInner {
            lru: LruCache::new(cap),
            expiry: ExpiryTracker::new(config.ttl),
        };

        Self {
            inner: Arc::new(RwLock::new(inner)),
            config,
        }
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get the current number of entries (including expired ones not yet
    /// physically reclaimed).
    pub async fn len(&self) -> usize {
        self.inner.read().await.lru.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.lru.is_empty()
    }

    /// Insert a value with the global TTL.
    ///
    /// Overwrites any existing entry for the key and re-arms its deadline.
    /// If the cache is at capacity, the least recently used entry is
    /// evicted first.
    pub async fn insert(&self, key: &str, value: V) {
        self.insert_inner(key, value, None).await;
    }

    /// Insert a value with a per-key TTL override.
    pub async fn insert_with_ttl(&self, key: &str, value: V, ttl: Duration) {
        self.insert_inner(key, value, Some(ttl)).await;
    }

    async fn insert_inner(&self, key: &str, value: V, ttl: Option<Duration>) {
        let mut inner = self.inner.write().await;

        Self::evict_if_full(&mut inner, self.config.max_entries, key);

        inner.lru.put(key.to_string(), value);
        inner.expiry.arm(key, ttl);

        trace!(key = %key, cache_size = inner.lru.len(), "Entry written");
    }

    /// Get a value, refreshing its LRU recency.
    ///
    /// Expired entries are physically dropped on observation and reported
    /// as absent. The TTL deadline is not renewed.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.write().await;

        if inner.expiry.is_expired(key) {
            Self::drop_expired(&mut inner, key);
            return None;
        }

        inner.lru.get(key).cloned()
    }

    /// Peek at a value without updating LRU order.
    pub async fn peek(&self, key: &str) -> Option<V> {
        let inner = self.inner.read().await;
        if inner.expiry.is_expired(key) {
            None
        } else {
            inner.lru.peek(key).cloned()
        }
    }

    /// Check if a key is present and not expired.
    pub async fn contains(&self, key: &str) -> bool {
        let inner = self.inner.read().await;
        inner.lru.contains(key) && !inner.expiry.is_expired(key)
    }

    /// Atomically get-or-create an entry, then mutate it.
    ///
    /// Under a single write guard: an expired entry is dropped, a missing
    /// entry is created via `init` with its TTL armed, and `f` runs against
    /// the live value with a flag saying whether this call created it. At
    /// most one initializer runs per key per window, even when concurrent
    /// callers race on a brand-new key.
    pub async fn upsert_with<R>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        init: impl FnOnce() -> V,
        f: impl FnOnce(&mut V, bool) -> R,
    ) -> R {
        let mut inner = self.inner.write().await;

        if inner.expiry.is_expired(key) {
            Self::drop_expired(&mut inner, key);
        }

        let created = !inner.lru.contains(key);
        if created {
            Self::evict_if_full(&mut inner, self.config.max_entries, key);
        }

        let CacheInner { lru, expiry } = &mut *inner;
        let value = lru.get_or_insert_mut(key.to_string(), init);
        if created {
            expiry.arm(key, ttl);
        }

        f(value, created)
    }

    /// Remove an entry.
    pub async fn remove(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.write().await;
        inner.expiry.remove(key);
        inner.lru.pop(key)
    }

    /// Remove every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    pub async fn remove_prefix(&self, prefix: &str) -> usize {
        let mut inner = self.inner.write().await;

        let keys: Vec<String> = inner
            .lru
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &keys {
            inner.lru.pop(key);
            inner.expiry.remove(key);
        }

        if !keys.is_empty() {
            debug!(prefix = %prefix, count = keys.len(), "Entries removed by prefix");
        }

        keys.len()
    }

    /// List every non-expired key that starts with `prefix`.
    pub async fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let inner = self.inner.read().await;
        inner
            .lru
            .iter()
            .filter(|(key, _)| key.starts_with(prefix) && !inner.expiry.is_expired(key))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Physically reclaim expired entries.
    ///
    /// Returns the number of entries reclaimed. Expired entries are also
    /// dropped lazily whenever they are observed, so calling this is
    /// optional housekeeping.
    pub async fn cleanup_expired(&self) -> usize {
        let mut inner = self.inner.write().await;
        let expired = inner.expiry.drain_expired();

        let mut count = 0;
        for key in expired {
            if inner.lru.pop(&key).is_some() {
                trace!(key = %key, "Reclaiming expired entry");
                count += 1;
            }
        }

        if count > 0 {
            debug!(count = count, "Reclaimed expired entries");
        }

        count
    }

    /// Get cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.read().await;
        CacheStats {
            size: inner.lru.len(),
            capacity: self.config.max_entries,
            ttl_tracked: inner.expiry.len(),
        }
    }

    /// Drop an expired entry and its deadline record.
    fn drop_expired(inner: &mut CacheInner<V>, key: &str) {
        if inner.lru.pop(key).is_some() {
            debug!(key = %key, "Entry expired, dropping");
        }
        inner.expiry.remove(key);
    }

    /// Evict the least recently used entry if inserting `key` would
    /// overflow capacity.
    fn evict_if_full(inner: &mut CacheInner<V>, max_entries: usize, key: &str) {
        if inner.lru.len() >= max_entries && !inner.lru.contains(key) {
            if let Some((evicted_key, _)) = inner.lru.pop_lru() {
                debug!(key = %evicted_key, "Evicting LRU entry to make room");
                inner.expiry.remove(&evicted_key);
            }
        }
    }
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config.clone(),
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Current number of entries.
    pub size: usize,

    /// Maximum capacity.
    pub capacity: usize,

    /// Number of keys with an armed deadline.
    pub ttl_tracked: usize,
}
