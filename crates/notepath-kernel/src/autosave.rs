//! Debounced autosave for the active document.
//!
//! [`AutosaveController`] turns a stream of content changes into infrequent,
//! coalesced writes. Each change restarts a quiet-period timer; only the
//! content present when the timer fires is written.
//!
//! # Concurrency Model
//!
//! - The pending timer is a spawned tokio task owned through a [`TimerHandle`];
//!   replacing or dropping the handle aborts the task.
//! - A timer that fires defuses its own handle before writing, so a later edit
//!   never cancels a write already in flight.
//! - `epoch` is bumped by `initialize` and `teardown`; write results from an
//!   older epoch only touch the store, never the status.
//! - Overlapping writes may finish in any order. When the last one settles,
//!   the status follows the newest revision: saved, failed, or overwritten by
//!   an older snapshot (which schedules another write).
//! - Status is published on a `watch` channel and changed only under the
//!   state lock, so observers see transitions in order.

use std::sync::Arc;
use std::time::Duration;

use notepath_types::{DocKey, SaveStatus, StoredDocument};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::clock::SharedClock;
use crate::store::SharedStore;

/// Aborts the timer task when dropped, unless it already fired.
struct TimerHandle(Option<AbortHandle>);

impl TimerHandle {
    /// Called by the timer task itself once it owns the write.
    fn defuse(mut self) {
        self.0.take();
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
        }
    }
}

/// A scheduled write for a specific revision.
struct PendingSave {
    revision: u64,
    timer: TimerHandle,
}

struct State {
    key: Option<DocKey>,
    content: String,
    /// Edits are ignored until `initialize` has run.
    has_loaded: bool,
    epoch: u64,
    /// Bumped on every accepted edit.
    revision: u64,
    /// Revision held by the store, per the most recent successful write.
    saved_revision: u64,
    /// Highest revision whose write failed.
    failed_revision: u64,
    pending: Option<PendingSave>,
    writes_in_flight: usize,
    last_saved_at: Option<u64>,
}

struct Shared {
    store: SharedStore,
    clock: SharedClock,
    quiet_period: Duration,
    state: Mutex<State>,
    status_tx: watch::Sender<SaveStatus>,
}

/// Snapshot taken when a write starts.
struct WriteJob {
    epoch: u64,
    revision: u64,
    key: DocKey,
    content: String,
}

/// Owns the in-memory content of the active document and its autosave timer.
///
/// Dropping the controller tears it down (pending timer cancelled, no flush).
pub struct AutosaveController {
    shared: Arc<Shared>,
}

impl AutosaveController {
    /// Create a controller in the `Loading` state.
    pub fn new(store: SharedStore, clock: SharedClock, quiet_period: Duration) -> Self {
        let (status_tx, _) = watch::channel(SaveStatus::Loading);
        Self {
            shared: Arc::new(Shared {
                store,
                clock,
                quiet_period,
                state: Mutex::new(State {
                    key: None,
                    content: String::new(),
                    has_loaded: false,
                    epoch: 0,
                    revision: 0,
                    saved_revision: 0,
                    failed_revision: 0,
                    pending: None,
                    writes_in_flight: 0,
                    last_saved_at: None,
                }),
                status_tx,
            }),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Install freshly loaded state for `key` and arm autosave.
    ///
    /// `loaded` is `None` for a document that has never been written. Any
    /// pending timer from a previous key is cancelled.
    pub fn initialize(&self, key: DocKey, loaded: Option<StoredDocument>) {
        let mut state = self.shared.state.lock();
        state.pending = None;
        state.epoch += 1;
        state.revision = 0;
        state.saved_revision = 0;
        state.failed_revision = 0;
        state.writes_in_flight = 0;

        let (content, saved_at) = match loaded {
            Some(doc) => (doc.content, Some(doc.saved_at)),
            None => (String::new(), None),
        };
        debug!(key = %key, len = content.len(), ?saved_at, "autosave initialized");
        state.key = Some(key);
        state.content = content;
        state.last_saved_at = saved_at;
        state.has_loaded = true;
        self.shared.set_status(SaveStatus::Idle(saved_at));
    }

    /// Cancel any pending write without flushing and disarm autosave.
    ///
    /// An edit made inside the final quiet period is dropped. A write already
    /// in flight still reaches the store, but its outcome is ignored.
    pub fn teardown(&self) {
        let mut state = self.shared.state.lock();
        if state.pending.take().is_some() {
            debug!(key = ?state.key, "teardown cancelled pending save");
        }
        state.has_loaded = false;
        state.epoch += 1;
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Accept new content and (re)start the quiet-period timer.
    ///
    /// Ignored before `initialize` and when the content is unchanged. Must be
    /// called from within a tokio runtime.
    pub fn on_content_changed(&self, content: impl Into<String>) {
        let content = content.into();
        let mut state = self.shared.state.lock();
        if !state.has_loaded {
            debug!("edit ignored: document not loaded");
            return;
        }
        if state.content == content {
            return;
        }
        state.content = content;
        state.revision += 1;
        let revision = state.revision;
        self.shared.arm(&mut state, revision);
    }

    /// Re-arm the debounce after a failed write.
    ///
    /// Returns false (and does nothing) unless the status is `SaveFailed`.
    pub fn retry(&self) -> bool {
        let mut state = self.shared.state.lock();
        if *self.shared.status_tx.borrow() != SaveStatus::SaveFailed || !state.has_loaded {
            return false;
        }
        let revision = state.revision;
        info!(key = ?state.key, revision, "retrying failed save");
        self.shared.arm(&mut state, revision);
        true
    }

    /// Write the pending change now instead of waiting for the timer.
    ///
    /// Returns false without writing when nothing is pending.
    pub async fn flush(&self) -> bool {
        let job = {
            let mut state = self.shared.state.lock();
            match state.pending.take() {
                Some(pending) => self.shared.begin_write(&mut state, pending.revision),
                None => None,
            }
        };
        match job {
            Some(job) => {
                Arc::clone(&self.shared).write(job).await;
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Observation
    // =========================================================================

    pub fn status(&self) -> SaveStatus {
        *self.shared.status_tx.borrow()
    }

    /// Receive every status transition from now on.
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.shared.status_tx.subscribe()
    }

    pub fn content(&self) -> String {
        self.shared.state.lock().content.clone()
    }

    pub fn key(&self) -> Option<DocKey> {
        self.shared.state.lock().key.clone()
    }

    /// True while a write is scheduled but has not started.
    pub fn has_pending_save(&self) -> bool {
        self.shared.state.lock().pending.is_some()
    }
}

impl Drop for AutosaveController {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Shared {
    fn set_status(&self, status: SaveStatus) {
        let previous = self.status_tx.send_replace(status);
        if previous != status {
            debug!(from = previous.as_ref(), to = status.as_ref(), "save status");
        }
    }

    /// Replace any pending timer with a new one for `revision`.
    fn arm(self: &Arc<Self>, state: &mut State, revision: u64) {
        let shared = Arc::clone(self);
        let epoch = state.epoch;
        let quiet_period = self.quiet_period;
        let task = tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            shared.fire(epoch, revision).await;
        });
        // Dropping the previous handle aborts the superseded timer.
        state.pending = Some(PendingSave {
            revision,
            timer: TimerHandle(Some(task.abort_handle())),
        });
        self.set_status(SaveStatus::PendingSave);
    }

    /// Timer expiry. No-op if the timer was superseded in the meantime.
    async fn fire(self: Arc<Self>, epoch: u64, revision: u64) {
        let job = {
            let mut state = self.state.lock();
            let due = state.epoch == epoch
                && state.pending.as_ref().is_some_and(|p| p.revision == revision);
            if !due {
                return;
            }
            if let Some(pending) = state.pending.take() {
                pending.timer.defuse();
            }
            self.begin_write(&mut state, revision)
        };
        if let Some(job) = job {
            self.write(job).await;
        }
    }

    /// Snapshot content and enter `Saving`.
    fn begin_write(&self, state: &mut State, revision: u64) -> Option<WriteJob> {
        let key = state.key.clone()?;
        state.writes_in_flight += 1;
        self.set_status(SaveStatus::Saving);
        Some(WriteJob {
            epoch: state.epoch,
            revision,
            key,
            content: state.content.clone(),
        })
    }

    async fn write(self: Arc<Self>, job: WriteJob) {
        let saved_at = self.clock.now_millis();
        let doc = StoredDocument::new(job.content, saved_at);
        let result = self.store.write(&job.key, doc).await;

        let mut state = self.state.lock();
        if state.epoch != job.epoch {
            debug!(key = %job.key, "write finished after document switch");
            return;
        }
        state.writes_in_flight = state.writes_in_flight.saturating_sub(1);

        match result {
            Ok(()) => {
                info!(key = %job.key, revision = job.revision, saved_at, "saved");
                state.saved_revision = job.revision;
                state.last_saved_at = Some(saved_at);
            }
            Err(e) => {
                warn!(key = %job.key, revision = job.revision, error = %e, "save failed");
                state.failed_revision = state.failed_revision.max(job.revision);
            }
        }

        // Writes may finish out of order. Once none are left, the status
        // depends only on whether the newest edit is what the store holds.
        if state.pending.is_some() || state.writes_in_flight > 0 {
            return;
        }
        let revision = state.revision;
        if state.saved_revision == revision {
            self.set_status(SaveStatus::Idle(state.last_saved_at));
        } else if state.failed_revision == revision {
            self.set_status(SaveStatus::SaveFailed);
        } else {
            // An older snapshot landed after the newest one.
            info!(key = %job.key, revision, "stale write landed last, saving again");
            self.arm(&mut state, revision);
        }
    }
}
