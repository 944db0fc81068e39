//! Error types for document store operations.

use thiserror::Error;

/// Errors from a [`DocumentStore`](crate::DocumentStore).
///
/// Transport and backend failures are not distinguished: a store is either
/// reachable or it isn't.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Read or write failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create an Unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Unavailable(format!("sqlite: {e}"))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
