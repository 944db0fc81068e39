//! One active document: load → edit → autosave.
//!
//! A [`DocumentSession`] is bound to a single key for its whole life.
//! Navigation is a full reload: the current controller is torn down and a
//! fresh one is loaded for the new key, with nothing carried across.

use std::time::Duration;

use notepath_types::{DocKey, SaveStatus, SessionId};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::autosave::AutosaveController;
use crate::clock::SharedClock;
use crate::path::{build_navigation_target, resolve_current_key};
use crate::store::SharedStore;

pub struct DocumentSession {
    id: SessionId,
    key: DocKey,
    store: SharedStore,
    clock: SharedClock,
    quiet_period: Duration,
    autosave: AutosaveController,
}

impl DocumentSession {
    /// Bind a session to `location_path` without touching the store.
    ///
    /// Status is `Loading` until [`load`](Self::load) completes, so callers can
    /// subscribe first and observe the whole lifecycle.
    pub fn new(
        location_path: &str,
        store: SharedStore,
        clock: SharedClock,
        quiet_period: Duration,
    ) -> Self {
        let key = resolve_current_key(location_path);
        let autosave = AutosaveController::new(store.clone(), clock.clone(), quiet_period);
        Self {
            id: SessionId::new(),
            key,
            store,
            clock,
            quiet_period,
            autosave,
        }
    }

    /// Bind and load in one step.
    pub async fn open(
        location_path: &str,
        store: SharedStore,
        clock: SharedClock,
        quiet_period: Duration,
    ) -> Self {
        let session = Self::new(location_path, store, clock, quiet_period);
        session.load().await;
        session
    }

    /// Read the document and hand it to the autosave controller.
    ///
    /// A failed read is logged and treated like a document that does not
    /// exist yet: the session starts with empty content.
    pub async fn load(&self) {
        let loaded = match self.store.read(&self.key).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!(session = %self.id, key = %self.key, error = %e, "load failed, starting empty");
                None
            }
        };
        info!(
            session = %self.id,
            key = %self.key,
            found = loaded.is_some(),
            "document loaded"
        );
        self.autosave.initialize(self.key.clone(), loaded);
    }

    /// Forward an edit to the autosave controller.
    pub fn edit(&self, content: impl Into<String>) {
        self.autosave.on_content_changed(content);
    }

    /// Navigate to the location named by `user_input`.
    ///
    /// Blank input is rejected and nothing happens (`None`). Otherwise the
    /// current document is torn down without flushing, the session rebinds to
    /// the new key and loads it, and the new location is returned. Status
    /// receivers from before the navigation close; subscribe again.
    pub async fn navigate(&mut self, user_input: &str) -> Option<String> {
        let target = build_navigation_target(user_input)?;
        info!(session = %self.id, from = %self.key, to = %target, "navigating");
        self.autosave.teardown();
        *self = Self::new(&target, self.store.clone(), self.clock.clone(), self.quiet_period);
        self.load().await;
        Some(target)
    }

    /// Cancel any pending write without flushing.
    pub fn teardown(&self) {
        self.autosave.teardown();
    }

    /// Write a pending edit immediately. False when nothing was pending.
    pub async fn flush(&self) -> bool {
        self.autosave.flush().await
    }

    /// Re-arm autosave after a failed write.
    pub fn retry(&self) -> bool {
        self.autosave.retry()
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn key(&self) -> &DocKey {
        &self.key
    }

    /// The location this session is editing (`/{key}`).
    pub fn location(&self) -> String {
        self.key.location()
    }

    pub fn content(&self) -> String {
        self.autosave.content()
    }

    pub fn status(&self) -> SaveStatus {
        self.autosave.status()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.autosave.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use notepath_types::StoredDocument;

    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;

    const QUIET: Duration = Duration::from_millis(1000);

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    fn session(location: &str, store: &Arc<MemoryStore>) -> DocumentSession {
        DocumentSession::new(location, store.clone(), Arc::new(ManualClock::new(10)), QUIET)
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_then_idle() {
        let store = Arc::new(MemoryStore::new());
        store.insert("foo", StoredDocument::new("stored", 3));
        let s = session("/foo", &store);

        assert_eq!(s.key().as_str(), "foo");
        assert_eq!(s.status(), SaveStatus::Loading);

        s.load().await;
        assert_eq!(s.status(), SaveStatus::Idle(Some(3)));
        assert_eq!(s.content(), "stored");
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_root_path_opens_index() {
        let store = Arc::new(MemoryStore::new());
        let s = session("/", &store);
        assert_eq!(s.key().as_str(), "index");
        assert_eq!(s.location(), "/index");
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_failure_starts_empty_and_stays_interactive() {
        let store = Arc::new(MemoryStore::new());
        store.insert("k", StoredDocument::new("unreachable", 1));
        store.set_reads_fail(true);

        let s = session("/k", &store);
        s.load().await;
        assert_eq!(s.content(), "");
        assert_eq!(s.status(), SaveStatus::Idle(None));

        s.edit("fresh");
        advance(1_000).await;
        assert_eq!(store.get(&DocKey::new("k")).unwrap().content, "fresh");
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_is_saved_under_session_key() {
        let store = Arc::new(MemoryStore::new());
        let s = session("/a/b", &store);
        s.load().await;

        s.edit("hello");
        advance(1_000).await;
        assert_eq!(store.get(&DocKey::new("a/b")).unwrap(), StoredDocument::new("hello", 10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_navigation_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let mut s = session("/here", &store);
        s.load().await;
        let id = s.id();

        assert_eq!(s.navigate("   ").await, None);
        assert_eq!(s.key().as_str(), "here");
        assert_eq!(s.id(), id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_reloads_and_drops_pending_edit() {
        let store = Arc::new(MemoryStore::new());
        store.insert("there", StoredDocument::new("there's text", 5));
        let mut s = session("/here", &store);
        s.load().await;
        let old_id = s.id();

        s.edit("typed just before leaving");
        assert_eq!(s.navigate("  there ").await.as_deref(), Some("/there"));

        assert_ne!(s.id(), old_id);
        assert_eq!(s.key().as_str(), "there");
        assert_eq!(s.content(), "there's text");
        assert_eq!(s.status(), SaveStatus::Idle(Some(5)));

        advance(5_000).await;
        assert_eq!(store.get(&DocKey::new("here")), None);
        assert_eq!(store.write_count(), 0);
    }
}
