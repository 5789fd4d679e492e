//! Error types for session tracking.

/// Error type for session tracking.
///
/// Claim trouble is an authentication failure, not an internal fault:
/// callers treat it exactly like an invalid session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required token claim was absent or malformed. The operation fails
    /// closed rather than deriving a permissive session key.
    #[error("Missing or malformed token claim: {0}")]
    MalformedClaims(&'static str),
}

/// Result type for session tracking.
pub type Result<T> = std::result::Result<T, Error>;
