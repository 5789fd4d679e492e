//! TTL-bounded cache with LRU eviction.
//!
//! This crate provides the shared in-memory cache primitive used by the
//! rate limiter and the session tracker:
//! - Bounded capacity with LRU eviction to prevent unbounded memory growth
//! - Write-time expiry (a global default TTL plus per-key overrides);
//!   reads never extend an entry's lifetime
//! - An atomic get-or-create-then-mutate operation for counter-style keys
//! - Bulk scan and removal by key prefix
//!
//! # Example
//!
//! ```rust,ignore
//! use tollgate_cache::{TtlCache, CacheConfig};
//!
//! let config = CacheConfig::new()
//!     .with_max_entries(10_000)
//!     .with_ttl(Duration::from_secs(3600));
//!
//! let cache: TtlCache<u64> = TtlCache::new(config);
//! ```

mod cache;
mod config;
mod expiry;

pub use cache::{CacheStats, TtlCache};
pub use config::CacheConfig;
pub use expiry::ExpiryTracker;
