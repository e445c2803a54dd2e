//! JSON-file `StateStore` backend.
//!
//! A single JSON object on disk mapping walkthrough name to persisted
//! value — the durable analog of a browser's local storage. Writes go
//! through a read-modify-write cycle serialized by a mutex, so concurrent
//! machines in one process can safely share a store instance.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::debug;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::store::traits::StateStore;

/// File-backed store.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles against the file.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (or create room for) a state file.
    ///
    /// The file itself is created lazily on first save; a missing file
    /// reads as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        debug!(path = %path.display(), "Walkthrough state file opened");
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    async fn read_entries(path: &Path) -> Result<HashMap<String, String>, StoreError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Serialization(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_entries(
        path: &Path,
        entries: &HashMap<String, String>,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for FileStore {
    async fn load(&self, name: &str) -> Result<Option<String>, StoreError> {
        let entries = Self::read_entries(&self.path).await?;
        Ok(entries.get(name).cloned())
    }

    async fn save(&self, name: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = Self::read_entries(&self.path).await?;
        entries.insert(name.to_string(), value.to_string());
        Self::write_entries(&self.path, &entries).await
    }

    async fn clear(&self, name: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = Self::read_entries(&self.path).await?;
        if entries.remove(name).is_some() {
            Self::write_entries(&self.path, &entries).await?;
        }
        Ok(())
    }
}
