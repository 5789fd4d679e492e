//! Fixed-window request rate limiting.
//!
//! Counts requests per composite key (rule + subject + path) inside a
//! fixed time window and rejects callers once a configured ceiling is
//! exceeded. Counters live in a bounded, self-expiring cache; a window
//! ends when its counter's TTL elapses, which resets the count to absent.
//!
//! Request state (caller IP, path, operation name) is passed in explicitly
//! by the caller rather than read from ambient context, and the limiter is
//! an explicitly owned value rather than a process-wide singleton.
//!
//! # Example
//!
//! ```rust,ignore
//! use tollgate_limiter::{LimitRule, RateLimiter, RequestInfo};
//!
//! let limiter = RateLimiter::default();
//! let rule = LimitRule::new("login", 3, Duration::from_secs(60));
//! let request = RequestInfo::new("1.2.3.4".parse()?, "/api/login", "login");
//!
//! let result = limiter.with_rate_limit(&rule, &request, do_login()).await?;
//! ```

mod config;
mod error;
mod key;
mod limiter;

pub use config::{LimitKind, LimitRule, LimiterConfig, RequestInfo};
pub use error::{Error, Result};
pub use key::derive_key;
pub use limiter::{Decision, RateLimiter};
