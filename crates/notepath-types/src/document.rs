//! The persisted document record.

use serde::{Deserialize, Serialize};

/// Value stored for a key: last written text and when it was written.
///
/// Writes overwrite the whole record (last-write-wins).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Full document text. May be empty.
    pub content: String,
    /// When this value was written (Unix millis).
    pub saved_at: u64,
}

impl StoredDocument {
    pub fn new(content: impl Into<String>, saved_at: u64) -> Self {
        Self {
            content: content.into(),
            saved_at,
        }
    }
}
