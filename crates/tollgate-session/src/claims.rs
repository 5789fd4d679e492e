//! Token claims and session key derivation.

use std::fmt;

use crate::error::{Error, Result};

/// Mint a fresh per-login unique id.
///
/// Minted once per successful authentication and embedded in the issued
/// token's claims; verification recomputes the session key from the same id.
pub fn mint_login_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// The claims the session layer needs from a (verified) token.
///
/// Extracting and signature-checking the token is the signing
/// collaborator's job; this type only validates that the claims it is
/// handed are usable for key derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Authenticated subject (e.g. the username).
    pub subject: String,

    /// Per-login unique id minted at token issuance.
    pub login_id: String,
}

impl TokenClaims {
    /// Create claims, rejecting empty parts.
    pub fn new(subject: impl Into<String>, login_id: impl Into<String>) -> Result<Self> {
        Self::from_parts(Some(&subject.into()), Some(&login_id.into()))
    }

    /// Build claims from optional extraction results, failing closed.
    ///
    /// An absent or empty subject or login id yields
    /// [`Error::MalformedClaims`]; there is no permissive fallback key.
    pub fn from_parts(subject: Option<&str>, login_id: Option<&str>) -> Result<Self> {
        let subject = match subject {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => return Err(Error::MalformedClaims("subject")),
        };
        let login_id = match login_id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(Error::MalformedClaims("login id")),
        };

        Ok(Self { subject, login_id })
    }
}

/// Derived session key: `{prefix}{subject}:{login_id}`.
///
/// Derivation is deterministic and exact, so the key recomputed at
/// verification time matches the one written at issuance byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    /// Derive the session key for a set of claims.
    pub fn derive(prefix: &str, claims: &TokenClaims) -> Self {
        Self(format!("{}{}:{}", prefix, claims.subject, claims.login_id))
    }

    /// Wrap an already-derived key string (e.g. from a prefix scan).
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_login_id_unique_and_simple() {
        let a = mint_login_id();
        let b = mint_login_id();

        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(!a.contains('-'));
    }

    #[test]
    fn test_claims_from_parts() {
        let claims = TokenClaims::from_parts(Some("alice"), Some("abc123")).unwrap();
        assert_eq!(claims.subject, "alice");
        assert_eq!(claims.login_id, "abc123");
    }

    #[test]
    fn test_claims_fail_closed() {
        assert!(matches!(
            TokenClaims::from_parts(None, Some("abc123")),
            Err(Error::MalformedClaims("subject"))
        ));
        assert!(matches!(
            TokenClaims::from_parts(Some(""), Some("abc123")),
            Err(Error::MalformedClaims("subject"))
        ));
        assert!(matches!(
            TokenClaims::from_parts(Some("alice"), None),
            Err(Error::MalformedClaims("login id"))
        ));
        assert!(matches!(
            TokenClaims::from_parts(Some("alice"), Some("")),
            Err(Error::MalformedClaims("login id"))
        ));
    }

    #[test]
    fn test_key_derivation_exact() {
        let claims = TokenClaims::new("alice", "abc123").unwrap();
        let key = SessionKey::derive("online-token:", &claims);

        assert_eq!(key.as_str(), "online-token:alice:abc123");
        assert_eq!(key, SessionKey::derive("online-token:", &claims));
    }
}
