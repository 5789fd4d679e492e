//! Token session validity tracking and renewal.
//!
//! Tracks issued authentication tokens by session key (subject plus a
//! per-login unique id) in a bounded, self-expiring cache. Presence in the
//! cache is the sole source of truth for "this session is valid": a token
//! whose signature still parses but whose session entry is gone is invalid.
//! A renewal operation silently extends sessions that are inside a grace
//! window before expiry, so active callers never have to re-authenticate.
//!
//! Signing and verifying the token itself is a collaborator's job; this
//! crate only consumes the subject and login-id claims the collaborator
//! extracted.
//!
//! # Example
//!
//! ```rust,ignore
//! use tollgate_session::{SessionConfig, SessionTracker, TokenClaims, mint_login_id};
//!
//! let tracker = SessionTracker::new(SessionConfig::default());
//!
//! // On successful login:
//! let claims = TokenClaims::new("alice", mint_login_id())?;
//! let key = tracker.record(&claims).await;
//!
//! // On each authenticated request:
//! let key = tracker.session_key(&claims);
//! if tracker.is_valid(&key).await {
//!     tracker.renew_if_near(&key).await;
//! }
//! ```

mod claims;
mod config;
mod error;
mod tracker;

pub use claims::{SessionKey, TokenClaims, mint_login_id};
pub use config::SessionConfig;
pub use error::{Error, Result};
pub use tracker::{SessionInfo, SessionTracker};
