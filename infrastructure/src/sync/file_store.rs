//! File-backed sync queue.
//!
//! Each entry is one pretty-printed JSON file `<id>.json` in the cache
//! directory, where ids look like `case_<millis>` (with a `_<n>` suffix on
//! collision). The directory is created on first enqueue.
//!
//! A failed write never leaves a half-written entry behind. An entry that
//! cannot be parsed is renamed to `<id>.corrupt` on first load, so it is
//! reported once and then stays out of the queue for manual inspection.

use async_trait::async_trait;
use consilium_application::{SyncStore, SyncStoreError};
use consilium_domain::{SyncEntryId, SyncQueueEntry};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

const ENTRY_PREFIX: &str = "case_";
const ENTRY_EXTENSION: &str = "json";
const CORRUPT_EXTENSION: &str = "corrupt";

pub struct FileSyncStore {
    dir: PathBuf,
}

impl FileSyncStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, id: &SyncEntryId) -> PathBuf {
        self.dir.join(format!("{}.{}", id, ENTRY_EXTENSION))
    }

    fn storage_error(path: &Path, e: std::io::Error) -> SyncStoreError {
        SyncStoreError::Storage(format!("{}: {}", path.display(), e))
    }
}

/// Write `bytes` into a freshly reserved entry file, deleting the file if
/// the write does not complete.
async fn fill_or_discard<W>(mut writer: W, path: &Path, bytes: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match writer.write_all(bytes).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        drop(writer);
        discard(path).await;
    }
    written
}

async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        warn!("Could not remove incomplete entry {}: {}", path.display(), e);
    }
}

/// Queue order: creation millis, then collision suffix, then name.
fn queue_order(id: &SyncEntryId) -> (u64, u64, String) {
    let rest = id.as_str().strip_prefix(ENTRY_PREFIX).unwrap_or(id.as_str());
    let mut parts = rest.splitn(2, '_');
    let millis = parts.next().and_then(|p| p.parse().ok()).unwrap_or(u64::MAX);
    let suffix = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    (millis, suffix, id.as_str().to_string())
}

#[async_trait]
impl SyncStore for FileSyncStore {
    async fn enqueue(&self, entry: &SyncQueueEntry) -> Result<SyncEntryId, SyncStoreError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Self::storage_error(&self.dir, e))?;

        let mut id = entry.id.clone();
        let mut suffix = 1;
        let (file, path) = loop {
            let path = self.path_of(&id);
            match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => break (file, path),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    id = SyncEntryId::new(format!("{}_{}", entry.id, suffix));
                    suffix += 1;
                }
                Err(e) => return Err(Self::storage_error(&path, e)),
            }
        };

        let mut stored = entry.clone();
        stored.id = id.clone();
        let json = match serde_json::to_vec_pretty(&stored) {
            Ok(json) => json,
            Err(e) => {
                drop(file);
                discard(&path).await;
                return Err(SyncStoreError::Serialization(e.to_string()));
            }
        };
        fill_or_discard(file, &path, &json)
            .await
            .map_err(|e| Self::storage_error(&path, e))?;

        debug!("Queued {} at {}", id, path.display());
        Ok(id)
    }

    async fn list_pending(&self) -> Result<Vec<SyncEntryId>, SyncStoreError> {
        let mut dir = match fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Self::storage_error(&self.dir, e)),
        };

        let mut ids = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| Self::storage_error(&self.dir, e))?
        {
            let path = item.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if stem.starts_with(ENTRY_PREFIX) => ids.push(SyncEntryId::new(stem)),
                _ => {}
            }
        }

        ids.sort_by_key(queue_order);
        Ok(ids)
    }

    async fn load(&self, id: &SyncEntryId) -> Result<SyncQueueEntry, SyncStoreError> {
        let path = self.path_of(id);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SyncStoreError::NotFound(id.clone()));
            }
            Err(e) => return Err(Self::storage_error(&path, e)),
        };
        match serde_json::from_slice(&bytes) {
            Ok(entry) => Ok(entry),
            Err(e) => {
                let quarantined = path.with_extension(CORRUPT_EXTENSION);
                warn!(
                    "Unreadable queue entry {}, moving to {}: {}",
                    path.display(),
                    quarantined.display(),
                    e
                );
                if let Err(rename_err) = fs::rename(&path, &quarantined).await {
                    warn!("Could not quarantine {}: {}", path.display(), rename_err);
                }
                Err(SyncStoreError::Serialization(format!("{}: {}", path.display(), e)))
            }
        }
    }

    async fn remove(&self, id: &SyncEntryId) -> Result<(), SyncStoreError> {
        let path = self.path_of(id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SyncStoreError::NotFound(id.clone())),
            Err(e) => Err(Self::storage_error(&path, e)),
        }
    }

    fn location(&self) -> Option<String> {
        Some(self.dir.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consilium_domain::{
        CaseRecord, ComplexityAssessment, LocalAnalysis, PhaseTimings, PreliminaryAssessment,
        StructuredCase,
    };

    fn entry(millis: u64) -> SyncQueueEntry {
        let case = CaseRecord::new("chest pain", 1.0);
        SyncQueueEntry {
            id: SyncEntryId::from_timestamp(millis),
            created_at_ms: millis,
            analysis: LocalAnalysis {
                structured: StructuredCase::from_raw(&case),
                preliminary: PreliminaryAssessment {
                    summary: "stable angina".to_string(),
                    diagnoses: vec!["Stable angina".to_string()],
                    recommendations: vec![],
                    confidence: 0.7,
                    complexity: ComplexityAssessment::from_signals(vec![]),
                    escalation_recommended: false,
                },
                offline: true,
                queued_as: None,
                timings: PhaseTimings::new(),
            },
        }
    }

    #[tokio::test]
    async fn test_enqueue_writes_case_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSyncStore::new(dir.path().join("cache"));

        let id = store.enqueue(&entry(1700000000000)).await.unwrap();
        assert_eq!(id.as_str(), "case_1700000000000");
        assert!(dir.path().join("cache/case_1700000000000.json").exists());

        let loaded = store.load(&id).await.unwrap();
        assert_eq!(loaded.analysis.preliminary.summary, "stable angina");
    }

    #[tokio::test]
    async fn test_collisions_get_suffixes_and_keep_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSyncStore::new(dir.path());

        let b = store.enqueue(&entry(2000)).await.unwrap();
        let a = store.enqueue(&entry(1000)).await.unwrap();
        let b2 = store.enqueue(&entry(2000)).await.unwrap();
        assert_eq!(b2.as_str(), "case_2000_1");

        let pending = store.list_pending().await.unwrap();
        assert_eq!(pending, vec![a, b, b2.clone()]);
        assert_eq!(store.load(&b2).await.unwrap().id, b2);
    }

    #[tokio::test]
    async fn test_remove_and_missing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSyncStore::new(dir.path());
        let id = store.enqueue(&entry(5)).await.unwrap();

        store.remove(&id).await.unwrap();
        assert!(store.list_pending().await.unwrap().is_empty());
        assert!(matches!(store.remove(&id).await, Err(SyncStoreError::NotFound(_))));
        assert!(matches!(store.load(&id).await, Err(SyncStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_dir_has_nothing_pending() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSyncStore::new(dir.path().join("never-created"));
        assert!(store.list_pending().await.unwrap().is_empty());
        assert!(store.location().unwrap().contains("never-created"));
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_quarantined_and_others_still_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("case_1.json"), "").unwrap();
        let store = FileSyncStore::new(dir.path());
        let good = store.enqueue(&entry(2)).await.unwrap();

        let pending = store.list_pending().await.unwrap();
        assert_eq!(pending.len(), 2);

        let mut loaded = Vec::new();
        for id in &pending {
            match store.load(id).await {
                Ok(entry) => loaded.push(entry.id),
                Err(e) => assert!(matches!(e, SyncStoreError::Serialization(_))),
            }
        }
        assert_eq!(loaded, vec![good.clone()]);

        assert_eq!(store.list_pending().await.unwrap(), vec![good]);
        assert!(dir.path().join("case_1.corrupt").exists());
    }

    struct FullDisk;

    impl AsyncWrite for FullDisk {
        fn poll_write(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::task::Poll::Ready(Err(std::io::Error::other("no space left on device")))
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_entry_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case_9.json");
        std::fs::write(&path, "").unwrap();

        let result = fill_or_discard(FullDisk, &path, b"{}").await;
        assert!(result.is_err());
        assert!(!path.exists());

        let store = FileSyncStore::new(dir.path());
        assert!(store.list_pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.json"), "{}").unwrap();
        std::fs::write(dir.path().join("case_1.txt"), "x").unwrap();
        let store = FileSyncStore::new(dir.path());
        assert!(store.list_pending().await.unwrap().is_empty());
    }
}
