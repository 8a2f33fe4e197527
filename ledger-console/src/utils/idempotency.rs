//! Client-supplied keys that let the backends deduplicate a retried mutation.
//!
//! One key identifies one logical invocation. The caller keeps the
//! [`IdempotencyKey`] and passes the same value again if the operator resubmits
//! the same action; a new action always gets a new key.

use rand::{distributions::Alphanumeric, Rng};
use std::sync::atomic::{AtomicU64, Ordering};

/// Header carrying the key on mutating payout and ledger calls.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

const RANDOM_SUFFIX_LEN: usize = 12;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// `<scope>-<millis>-<sequence>-<random>`; the scope is omitted when `None`.
    pub fn generate(scope: Option<&str>) -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let random: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RANDOM_SUFFIX_LEN)
            .map(char::from)
            .collect();

        let key = match scope.map(str::trim).filter(|s| !s.is_empty()) {
            Some(scope) => format!("{}-{}-{}-{}", scope, millis, sequence, random),
            None => format!("{}-{}-{}", millis, sequence, random),
        };
        Self(key)
    }

    /// Key for an action against one target, e.g. `confirm` on a payout id.
    pub fn for_target(action: &str, target: impl std::fmt::Display) -> Self {
        Self::generate(Some(&format!("{}-{}", action, target)))
    }

    /// Re-wrap a key issued earlier so a resubmission carries the same value.
    pub fn reuse(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ten_thousand_keys_never_collide() {
        let keys: HashSet<IdempotencyKey> = (0..10_000)
            .map(|_| IdempotencyKey::generate(Some("payout")))
            .collect();
        assert_eq!(keys.len(), 10_000);
    }

    #[test]
    fn keys_are_namespaced_by_scope() {
        let key = IdempotencyKey::generate(Some("confirm"));
        assert!(key.as_str().starts_with("confirm-"));

        let unscoped = IdempotencyKey::generate(None);
        assert!(unscoped.as_str().chars().next().unwrap().is_ascii_digit());

        let blank = IdempotencyKey::generate(Some("  "));
        assert!(blank.as_str().chars().next().unwrap().is_ascii_digit());
    }

    #[test]
    fn target_keys_differ_per_invocation() {
        let first = IdempotencyKey::for_target("reverse", "p-1");
        let second = IdempotencyKey::for_target("reverse", "p-1");
        assert!(first.as_str().starts_with("reverse-p-1-"));
        assert_ne!(first, second);
    }

    #[test]
    fn reused_key_is_identical() {
        let key = IdempotencyKey::generate(Some("payout"));
        assert_eq!(IdempotencyKey::reuse(key.as_str()), key);
    }
}
