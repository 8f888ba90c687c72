// Storage backend selection

use std::path::{Path, PathBuf};

use prefsmith_io::{Backend, JsonFileBackend, MemoryBackend, SqliteBackend};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const JSON_FILE_NAME: &str = "preferences.json";
pub const SQLITE_FILE_NAME: &str = "preferences.db";

/// Where values are persisted. Selected by `kind` in the `[backend]` table:
///
/// ```toml
/// [backend]
/// kind = "sqlite"
/// path = "/var/lib/myapp/prefs.db"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Lost on exit. Mostly useful for tests and kiosk setups.
    Memory {
        #[serde(default)]
        quota_bytes: Option<usize>,
    },
    /// One JSON file, rewritten atomically.
    Json {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    Sqlite {
        #[serde(default)]
        path: Option<PathBuf>,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Json { path: None }
    }
}

impl BackendConfig {
    /// Resolved file location, or `None` for the memory backend.
    ///
    /// Relative paths and missing paths are resolved against `dir`.
    pub fn file_path(&self, dir: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
        let (path, file_name) = match self {
            BackendConfig::Memory { .. } => return Ok(None),
            BackendConfig::Json { path } => (path, JSON_FILE_NAME),
            BackendConfig::Sqlite { path } => (path, SQLITE_FILE_NAME),
        };

        match (path, dir) {
            (Some(path), _) if path.is_absolute() => Ok(Some(path.clone())),
            (Some(path), Some(dir)) => Ok(Some(dir.join(path))),
            (Some(path), None) => Ok(Some(path.clone())),
            (None, Some(dir)) => Ok(Some(dir.join(file_name))),
            (None, None) => Err(ConfigError::Validation(
                "no platform config directory; set backend.path".into(),
            )),
        }
    }

    pub fn open(&self, dir: Option<&Path>) -> Result<Box<dyn Backend>, ConfigError> {
        let path = self.file_path(dir)?;
        let backend: Box<dyn Backend> = match (self, path) {
            (BackendConfig::Memory { quota_bytes: Some(quota) }, _) => Box::new(MemoryBackend::with_quota(*quota)),
            (BackendConfig::Memory { quota_bytes: None }, _) => Box::new(MemoryBackend::new()),
            (BackendConfig::Json { .. }, Some(path)) => Box::new(JsonFileBackend::open(path)?),
            (BackendConfig::Sqlite { .. }, Some(path)) => Box::new(SqliteBackend::open(&path)?),
            (_, None) => return Err(ConfigError::Validation("backend has no path".into())),
        };
        log::debug!("Opened {} preference storage", backend.name());
        Ok(backend)
    }
}
