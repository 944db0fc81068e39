//! In-memory document store.
//!
//! All data is lost when dropped. Supports simulated latency and outages so
//! callers can exercise the slow and failing paths without a real backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use notepath_types::{DocKey, StoredDocument};
use parking_lot::RwLock;

use super::DocumentStore;
use crate::error::{StoreError, StoreResult};

/// In-memory document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<DocKey, StoredDocument>>,
    /// Every accepted write, in completion order.
    writes: RwLock<Vec<(DocKey, StoredDocument)>>,
    latency: Option<Duration>,
    reads_fail: AtomicBool,
    writes_fail: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every read and write by `latency` (tokio time).
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Seed a document without recording it as a write.
    pub fn insert(&self, key: impl Into<DocKey>, doc: StoredDocument) {
        self.docs.write().insert(key.into(), doc);
    }

    /// Make subsequent reads fail with `Unavailable`.
    pub fn set_reads_fail(&self, fail: bool) {
        self.reads_fail.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail with `Unavailable`.
    pub fn set_writes_fail(&self, fail: bool) {
        self.writes_fail.store(fail, Ordering::SeqCst);
    }

    /// Current stored value for `key`, bypassing latency and failure toggles.
    pub fn get(&self, key: &DocKey) -> Option<StoredDocument> {
        self.docs.read().get(key).cloned()
    }

    /// Successful writes so far, oldest first.
    pub fn writes(&self) -> Vec<(DocKey, StoredDocument)> {
        self.writes.read().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.read().len()
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, key: &DocKey) -> StoreResult<Option<StoredDocument>> {
        self.simulate_latency().await;
        if self.reads_fail.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable(format!("read {key}: simulated outage")));
        }
        Ok(self.docs.read().get(key).cloned())
    }

    async fn write(&self, key: &DocKey, doc: StoredDocument) -> StoreResult<()> {
        self.simulate_latency().await;
        if self.writes_fail.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable(format!("write {key}: simulated outage")));
        }
        self.docs.write().insert(key.clone(), doc.clone());
        self.writes.write().push((key.clone(), doc));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_absent() {
        let store = MemoryStore::new();
        assert_eq!(store.read(&DocKey::new("nope")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let store = MemoryStore::new();
        let key = DocKey::new("a/b");
        store.write(&key, StoredDocument::new("hello", 10)).await.unwrap();

        let doc = store.read(&key).await.unwrap().unwrap();
        assert_eq!(doc.content, "hello");
        assert_eq!(doc.saved_at, 10);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_write_overwrites_unconditionally() {
        let store = MemoryStore::new();
        let key = DocKey::new("k");
        store.write(&key, StoredDocument::new("new", 20)).await.unwrap();
        store.write(&key, StoredDocument::new("old", 10)).await.unwrap();

        assert_eq!(store.get(&key).unwrap().content, "old");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_simulated_outage() {
        let store = MemoryStore::new();
        let key = DocKey::new("k");
        store.insert("k", StoredDocument::new("seed", 1));

        store.set_reads_fail(true);
        assert!(matches!(store.read(&key).await, Err(StoreError::Unavailable(_))));

        store.set_writes_fail(true);
        assert!(store.write(&key, StoredDocument::new("x", 2)).await.is_err());
        assert_eq!(store.get(&key).unwrap().content, "seed");
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_uses_tokio_time() {
        let store = MemoryStore::with_latency(Duration::from_millis(300));
        let start = tokio::time::Instant::now();
        store.write(&DocKey::new("k"), StoredDocument::new("x", 1)).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }
}
