//! Document store abstraction.
//!
//! The store is an external key-value backend consumed through two calls:
//! read a document by key, write a document by key. Writes overwrite
//! unconditionally (last-write-wins); there is no version check.
//!
//! - [`MemoryStore`] - process-local map (ephemeral runs, testing)
//! - [`SqliteStore`] - SQLite file via [`NoteDb`]

mod memory;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use notepath_types::{DocKey, StoredDocument};

use crate::error::StoreResult;

pub use memory::MemoryStore;
pub use sqlite::{NoteDb, NoteRow, SqliteStore};

/// Read/write access to persisted documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the stored value for `key`. `Ok(None)` means the key was never
    /// written.
    async fn read(&self, key: &DocKey) -> StoreResult<Option<StoredDocument>>;

    /// Replace the stored value for `key`.
    async fn write(&self, key: &DocKey, doc: StoredDocument) -> StoreResult<()>;
}

/// Thread-safe shared store handle.
pub type SharedStore = Arc<dyn DocumentStore>;
