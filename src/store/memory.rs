//! In-memory and no-op `StateStore` backends.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::store::traits::StateStore;

/// In-memory store.
///
/// Shared (via `Arc`) across machine constructions, this gives the same
/// reload-continuity as a durable backend within one process — useful in
/// tests and embedded hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(name).cloned())
    }

    async fn save(&self, name: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .await
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self, name: &str) -> Result<(), StoreError> {
        self.entries.lock().await.remove(name);
        Ok(())
    }
}

/// Store that persists nothing.
///
/// For hosts with no durable storage at all: loads report nothing
/// persisted, writes succeed and are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

#[async_trait]
impl StateStore for NoopStore {
    async fn load(&self, _name: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    async fn save(&self, _name: &str, _value: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn clear(&self, _name: &str) -> Result<(), StoreError> {
        Ok(())
    }
}
