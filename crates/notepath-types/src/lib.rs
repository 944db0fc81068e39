//! Shared document types for notepath.
//!
//! This crate is the leaf of the workspace: document keys, the persisted
//! document record, save status, and session identifiers. It has **no internal
//! notepath dependencies**.
//!
//! # Key Types
//!
//! |--------------------|---------------------------------------------|
//! | Type               | Purpose                                     |
//! |--------------------|---------------------------------------------|
//! | [`DocKey`]         | Document identity derived from a URL path   |
//! | [`StoredDocument`] | What the store holds for one key            |
//! | [`SaveStatus`]     | Derived autosave state of the active doc    |
//! | [`SessionId`]      | Which activation of a path (log correlation)|
//! |--------------------|---------------------------------------------|

pub mod document;
pub mod ids;
pub mod key;
pub mod status;

pub use document::StoredDocument;
pub use ids::SessionId;
pub use key::{DEFAULT_KEY, DocKey};
pub use status::SaveStatus;

/// Current time as Unix milliseconds.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
