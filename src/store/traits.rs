//! Backend-agnostic `StateStore` trait — the single persistence seam.
//!
//! The machine reads the store exactly once at construction and writes
//! through on every state change; afterwards the in-memory state is
//! authoritative. Hosts without durable storage (tests, server-side
//! rendering) inject [`NoopStore`](crate::store::NoopStore) and the
//! machine behaves as if nothing was ever persisted.

use async_trait::async_trait;

use crate::error::StoreError;

/// Durable key-value storage for walkthrough state.
///
/// One entry per walkthrough name; the value is either a step id or the
/// completion marker. Absence of the entry means not started.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the persisted value for a walkthrough, if any.
    async fn load(&self, name: &str) -> Result<Option<String>, StoreError>;

    /// Write the persisted value for a walkthrough.
    async fn save(&self, name: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the persisted entry for a walkthrough.
    async fn clear(&self, name: &str) -> Result<(), StoreError>;
}
