//! Sync queue ports
//!
//! [`SyncStore`] persists local results awaiting upload; [`RemoteUploader`]
//! pushes one of them to the remote tier. Both are used exclusively by the
//! local processing tier.

use async_trait::async_trait;
use consilium_domain::{SyncEntryId, SyncQueueEntry};
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
pub enum SyncStoreError {
    #[error("Sync entry not found: {0}")]
    NotFound(SyncEntryId),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Upload error: {0}")]
    Upload(String),
}

/// Persistence of the sync queue.
#[async_trait]
pub trait SyncStore: Send + Sync {
    /// Persist an entry; returns the id it was stored under.
    async fn enqueue(&self, entry: &SyncQueueEntry) -> Result<SyncEntryId, SyncStoreError>;

    /// Ids of every pending entry, oldest first.
    async fn list_pending(&self) -> Result<Vec<SyncEntryId>, SyncStoreError>;

    async fn load(&self, id: &SyncEntryId) -> Result<SyncQueueEntry, SyncStoreError>;

    async fn remove(&self, id: &SyncEntryId) -> Result<(), SyncStoreError>;

    /// Human-readable location (e.g. a cache directory), if any.
    fn location(&self) -> Option<String> {
        None
    }
}

/// Upload of one queued entry to the remote tier.
#[async_trait]
pub trait RemoteUploader: Send + Sync {
    /// `Ok(false)` means the remote side declined; the entry stays queued.
    async fn upload(&self, entry: &SyncQueueEntry) -> Result<bool, SyncStoreError>;
}

/// Volatile store for tests and cache-less deployments.
#[derive(Default)]
pub struct InMemorySyncStore {
    entries: Mutex<BTreeMap<SyncEntryId, SyncQueueEntry>>,
}

impl InMemorySyncStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SyncStore for InMemorySyncStore {
    async fn enqueue(&self, entry: &SyncQueueEntry) -> Result<SyncEntryId, SyncStoreError> {
        let mut entries = self.entries.lock().await;
        let mut id = entry.id.clone();
        let mut suffix = 1;
        while entries.contains_key(&id) {
            id = SyncEntryId::new(format!("{}_{}", entry.id, suffix));
            suffix += 1;
        }
        let mut stored = entry.clone();
        stored.id = id.clone();
        entries.insert(id.clone(), stored);
        Ok(id)
    }

    async fn list_pending(&self) -> Result<Vec<SyncEntryId>, SyncStoreError> {
        let entries = self.entries.lock().await;
        let mut pending: Vec<&SyncQueueEntry> = entries.values().collect();
        pending.sort_by(|a, b| a.created_at_ms.cmp(&b.created_at_ms).then(a.id.cmp(&b.id)));
        Ok(pending.into_iter().map(|e| e.id.clone()).collect())
    }

    async fn load(&self, id: &SyncEntryId) -> Result<SyncQueueEntry, SyncStoreError> {
        self.entries
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SyncStoreError::NotFound(id.clone()))
    }

    async fn remove(&self, id: &SyncEntryId) -> Result<(), SyncStoreError> {
        self.entries
            .lock()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SyncStoreError::NotFound(id.clone()))
    }
}
