//! Kernel configuration constants.
//!
//! Centralizes hardcoded values for easier configuration and documentation.

use std::time::Duration;

/// Quiet period after the last edit before a write is issued.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

/// Directory name under the XDG config and data dirs.
pub const APP_DIR_NAME: &str = "notepath";

/// Config file name inside the config dir.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// SQLite file name inside the data dir.
pub const DB_FILE_NAME: &str = "notes.db";
