//! RON-driven configuration.
//!
//! Looked up at `$XDG_CONFIG_HOME/notepath/config.ron`. Every field has a
//! default, and a missing file means "all defaults":
//!
//! ```ron
//! (
//!     quiet_period_ms: 1000,
//!     store: Sqlite("~/.local/share/notepath/notes.db"),
//! )
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{APP_DIR_NAME, CONFIG_FILE_NAME, DB_FILE_NAME, DEFAULT_QUIET_PERIOD};

/// Error type for config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("quiet period must be greater than zero")]
    ZeroQuietPeriod,
}

/// Where documents live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreConfig {
    /// Process-local; everything is lost on exit.
    Memory,
    /// SQLite file. `~` is expanded.
    Sqlite(String),
}

impl StoreConfig {
    /// Resolved database path for `Sqlite`, `None` for `Memory`.
    pub fn db_path(&self) -> Option<PathBuf> {
        match self {
            StoreConfig::Memory => None,
            StoreConfig::Sqlite(path) => Some(shellexpand::tilde(path).as_ref().into()),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Sqlite(default_db_path().display().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    /// Quiet period after the last edit before a write, in milliseconds.
    pub quiet_period_ms: u64,
    pub store: StoreConfig,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: DEFAULT_QUIET_PERIOD.as_millis() as u64,
            store: StoreConfig::default(),
        }
    }
}

impl PadConfig {
    /// Parse and validate a RON document.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: PadConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_ron(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load from the default location.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&default_config_path())
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.quiet_period_ms == 0 {
            return Err(ConfigError::ZeroQuietPeriod);
        }
        Ok(())
    }
}

/// `$XDG_CONFIG_HOME/notepath/config.ron` (falls back to `./config.ron`).
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_default()
        .join(CONFIG_FILE_NAME)
}

/// `$XDG_DATA_HOME/notepath/notes.db` (falls back to `./notes.db`).
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_default()
        .join(DB_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PadConfig::default();
        assert_eq!(config.quiet_period(), Duration::from_millis(1000));
        assert!(config.store.db_path().unwrap().ends_with("notes.db"));
    }

    #[test]
    fn test_parse_full() {
        let config = PadConfig::from_ron(
            r#"(quiet_period_ms: 250, store: Sqlite("/tmp/pad.db"))"#,
        )
        .unwrap();
        assert_eq!(config.quiet_period_ms, 250);
        assert_eq!(config.store.db_path(), Some(PathBuf::from("/tmp/pad.db")));
    }

    #[test]
    fn test_partial_uses_defaults() {
        let config = PadConfig::from_ron("(store: Memory)").unwrap();
        assert_eq!(config.quiet_period_ms, 1000);
        assert_eq!(config.store, StoreConfig::Memory);
        assert_eq!(config.store.db_path(), None);
    }

    #[test]
    fn test_rejects_zero_quiet_period() {
        assert!(matches!(
            PadConfig::from_ron("(quiet_period_ms: 0)"),
            Err(ConfigError::ZeroQuietPeriod)
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(PadConfig::from_ron("(store: Cloud)"), Err(ConfigError::Ron(_))));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = PadConfig::load(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, PadConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        std::fs::write(&path, "(quiet_period_ms: 40, store: Memory)").unwrap();
        let config = PadConfig::load(&path).unwrap();
        assert_eq!(config.quiet_period(), Duration::from_millis(40));
    }

    #[test]
    fn test_tilde_expands() {
        let store = StoreConfig::Sqlite("~/notes.db".into());
        let path = store.db_path().unwrap();
        if dirs::home_dir().is_some() {
            assert!(!path.starts_with("~"));
        }
        assert!(path.ends_with("notes.db"));
    }
}
