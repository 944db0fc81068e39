//! Save status of the active document.
//!
//! Derived, never persisted. Exactly one value holds at any instant:
//!
//! ```text
//! Loading ──▶ Idle ──edit──▶ PendingSave ──quiet period──▶ Saving ──ok──▶ Idle(now)
//!                                 ▲                           │
//!                                 └──────edit / retry─── SaveFailed ◀──err─┘
//! ```

use serde::{Deserialize, Serialize};
use strum::AsRefStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(tag = "state", content = "last_saved_at", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SaveStatus {
    /// Initial read from the store has not completed.
    #[default]
    Loading,
    /// Nothing pending. Carries the last successful write time, if any.
    Idle(Option<u64>),
    /// An edit is waiting for the quiet period to elapse.
    PendingSave,
    /// A write is in flight.
    Saving,
    /// The last write failed; content exists only in memory.
    SaveFailed,
}

impl SaveStatus {
    /// Last successful write time, when idle.
    pub fn last_saved_at(&self) -> Option<u64> {
        match self {
            SaveStatus::Idle(at) => *at,
            _ => None,
        }
    }

    /// True while edits exist that the store has not acknowledged.
    pub fn has_unsaved_changes(&self) -> bool {
        matches!(
            self,
            SaveStatus::PendingSave | SaveStatus::Saving | SaveStatus::SaveFailed
        )
    }
}
