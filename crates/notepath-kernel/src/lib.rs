//! # notepath-kernel
//!
//! The document synchronization lifecycle behind notepath.
//!
//! Any location path names a document. A [`DocumentSession`] resolves the path
//! to a [`DocKey`], loads the last stored state, and hands edits to an
//! [`AutosaveController`], which coalesces them into infrequent writes:
//!
//! ```text
//!   location ──▶ path::resolve_current_key ──▶ DocKey
//!                                                │
//!   DocumentStore::read ◀── DocumentSession ◀────┘
//!          │                      │ edits
//!          ▼                      ▼
//!   AutosaveController::initialize   on_content_changed ──▶ debounce timer
//!                                                               │ quiet period
//!                                   DocumentStore::write ◀── flush
//! ```
//!
//! Save status is published through a `tokio::sync::watch` channel so any
//! presentation layer can observe it without owning the state machine.

pub mod autosave;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod path;
pub mod session;
pub mod store;

pub use autosave::AutosaveController;
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use config::{ConfigError, PadConfig, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use path::{build_navigation_target, resolve_current_key};
pub use session::DocumentSession;
pub use store::{DocumentStore, MemoryStore, NoteDb, SharedStore, SqliteStore};

pub use notepath_types::{DocKey, SaveStatus, SessionId, StoredDocument};
