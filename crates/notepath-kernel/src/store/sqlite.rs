//! SQLite persistence for notes.
//!
//! One row per key. Writes replace the row; nothing is versioned.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use notepath_types::{DocKey, StoredDocument};
use parking_lot::Mutex;
use rusqlite::{params, Connection, Result as SqliteResult};

use super::DocumentStore;
use crate::error::{StoreError, StoreResult};

/// Database handle for note persistence.
pub struct NoteDb {
    conn: Connection,
}

/// A stored row, including bookkeeping columns the store contract omits.
#[derive(Debug, Clone)]
pub struct NoteRow {
    pub key: String,
    pub content: String,
    pub saved_at: i64,
    pub updated_at: i64,
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    key TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    saved_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;

impl NoteDb {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> SqliteResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> SqliteResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert or replace the note for `key`.
    pub fn put_note(&self, key: &str, content: &str, saved_at: i64) -> SqliteResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO notes (key, content, saved_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
            params![key, content, saved_at],
        )?;
        Ok(())
    }

    /// Get the note for `key`.
    pub fn get_note(&self, key: &str) -> SqliteResult<Option<NoteRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT key, content, saved_at, updated_at FROM notes WHERE key = ?1",
        )?;

        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(NoteRow {
                key: row.get(0)?,
                content: row.get(1)?,
                saved_at: row.get(2)?,
                updated_at: row.get(3)?,
            }))
        } else {
            Ok(None)
        }
    }

    /// All keys, sorted.
    pub fn list_keys(&self) -> SqliteResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM notes ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect()
    }
}

/// [`DocumentStore`] backed by a [`NoteDb`].
///
/// Statements are short and local, so they run inline under the lock rather
/// than on a blocking pool.
#[derive(Clone)]
pub struct SqliteStore {
    db: Arc<Mutex<NoteDb>>,
}

impl SqliteStore {
    pub fn new(db: NoteDb) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Open or create the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Ok(Self::new(NoteDb::open(path)?))
    }

    pub fn in_memory() -> StoreResult<Self> {
        Ok(Self::new(NoteDb::in_memory()?))
    }

    /// All stored keys, sorted.
    pub fn list_keys(&self) -> StoreResult<Vec<DocKey>> {
        let keys = self.db.lock().list_keys()?;
        Ok(keys.into_iter().map(DocKey::new).collect())
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn read(&self, key: &DocKey) -> StoreResult<Option<StoredDocument>> {
        let Some(row) = self.db.lock().get_note(key.as_str())? else {
            return Ok(None);
        };
        let saved_at = u64::try_from(row.saved_at).map_err(|_| {
            StoreError::unavailable(format!("invalid saved_at {} for {key}", row.saved_at))
        })?;
        Ok(Some(StoredDocument::new(row.content, saved_at)))
    }

    async fn write(&self, key: &DocKey, doc: StoredDocument) -> StoreResult<()> {
        // INTEGER columns are signed 64-bit.
        let saved_at = i64::try_from(doc.saved_at).map_err(|_| {
            StoreError::unavailable(format!("saved_at {} out of range for {key}", doc.saved_at))
        })?;
        self.db.lock().put_note(key.as_str(), &doc.content, saved_at)?;
        Ok(())
    }
}
