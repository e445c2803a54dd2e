//! Claim registry — display deduplication for steps rendered in more than
//! one place.
//!
//! When the same step's UI may be mounted twice at once (e.g. the same tip
//! slot appears in two layout regions), each instance registers under a
//! shared unique key and only the first registration wins display rights.
//! Losing a claim is not an error; the denied instance simply never shows.

use std::collections::HashMap;

use uuid::Uuid;

/// Opaque identity of one mounted step instance.
pub type InstanceId = Uuid;

/// Ephemeral map from unique key to the one instance allowed to display.
///
/// First registration wins; release only succeeds for the current owner,
/// so a stale instance can never evict its replacement.
#[derive(Debug, Default)]
pub struct ClaimRegistry {
    owners: HashMap<String, InstanceId>,
}

impl ClaimRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to claim `key` for `instance`.
    ///
    /// Succeeds if the key is unowned or already owned by this instance
    /// (idempotent re-registration). Returns whether `instance` holds the
    /// claim afterwards.
    pub fn register(&mut self, key: &str, instance: InstanceId) -> bool {
        match self.owners.get(key) {
            Some(owner) => *owner == instance,
            None => {
                self.owners.insert(key.to_string(), instance);
                true
            }
        }
    }

    /// Release `key` if `instance` is its current owner; otherwise a no-op.
    pub fn release(&mut self, key: &str, instance: InstanceId) {
        if self.owners.get(key) == Some(&instance) {
            self.owners.remove(key);
        }
    }

    /// Whether `instance` currently owns `key`.
    pub fn holds(&self, key: &str, instance: InstanceId) -> bool {
        self.owners.get(key) == Some(&instance)
    }

    /// Current owner of `key`, if any.
    pub fn owner(&self, key: &str) -> Option<InstanceId> {
        self.owners.get(key).copied()
    }
}
