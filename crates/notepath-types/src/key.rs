//! Document keys.
//!
//! A key is the string identity of a document. Any string is a valid key
//! (slashes, spaces, unicode, punctuation) except the empty string, which
//! normalizes to [`DEFAULT_KEY`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key used when the navigation path is empty (`/`).
pub const DEFAULT_KEY: &str = "index";

/// Identity of one document in the store.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocKey(String);

impl DocKey {
    /// Build a key, normalizing the empty string to [`DEFAULT_KEY`].
    ///
    /// No other escaping or validation happens.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.is_empty() {
            Self(DEFAULT_KEY.to_string())
        } else {
            Self(raw)
        }
    }

    /// The default document key.
    pub fn index() -> Self {
        Self(DEFAULT_KEY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The location path that addresses this document (`/{key}`).
    pub fn location(&self) -> String {
        format!("/{}", self.0)
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_KEY
    }
}

impl Default for DocKey {
    fn default() -> Self {
        Self::index()
    }
}

impl From<&str> for DocKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DocKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for DocKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
