//! Error types for rate limiting.

/// Error type for rate limiting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller exceeded a rule's ceiling inside the current window.
    #[error("Too many requests: {label} ({count}/{ceiling} in window)")]
    RateLimited {
        /// Label of the rule that rejected the call.
        label: String,
        /// Post-increment count that tripped the ceiling.
        count: u64,
        /// The rule's ceiling.
        ceiling: u64,
    },
}

/// Result type for rate limiting.
pub type Result<T> = std::result::Result<T, Error>;
