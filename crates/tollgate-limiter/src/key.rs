//! Composite key derivation for rate-limit counters.

use crate::config::{LimitKind, LimitRule, RequestInfo};

/// Derive the counter key for a rule and request.
///
/// The subject is the rule's explicit key when one is set and non-empty;
/// otherwise the caller IP for [`LimitKind::CallerIp`] rules, or the
/// operation name. The final key is `{rule id}_{subject}_{path}` with path
/// separators rewritten to underscores, so the same request always maps to
/// the exact counter that was created for it.
pub fn derive_key(rule: &LimitRule, request: &RequestInfo) -> String {
    let subject = match rule.key.as_deref() {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => match rule.kind {
            LimitKind::CallerIp => request.caller_ip.to_string(),
            LimitKind::Subject => request.operation.clone(),
        },
    };

    format!("{}_{}_{}", rule.id, subject, request.path.replace('/', "_"))
}
