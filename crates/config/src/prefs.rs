//! Preference configuration file.
//!
//! ```toml
//! prefix = "myapp."
//!
//! [backend]
//! kind = "json"
//! ```
//!
//! Every field is optional. The default is an empty prefix and a JSON file
//! in the platform config directory (`~/.config/<app>/preferences.json`).

use std::fs;
use std::path::{Path, PathBuf};

use prefsmith_engine::{PreferenceManager, PreferenceTree};
use prefsmith_io::{Backend, Storage};
use serde::{Deserialize, Serialize};

use crate::backend::BackendConfig;
use crate::error::ConfigError;

/// Platform config directory for `app`, if the platform has one.
pub fn default_dir(app: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(app))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefsConfig {
    /// Prepended to every preference key in the store.
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub backend: BackendConfig,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl PrefsConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: PrefsConfig = toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&input)
    }

    /// Like [`PrefsConfig::load`], but a missing or broken file yields the
    /// defaults. Config errors should not prevent startup.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Read { ref source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => {
                log::warn!("Using default preference config: {e}");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "prefix must not contain whitespace, got {:?}",
                self.prefix
            )));
        }
        if let BackendConfig::Memory { quota_bytes: Some(0) } = self.backend {
            return Err(ConfigError::Validation("backend.quota_bytes must be positive".into()));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// Open
// ---------------------------------------------------------------------------

impl PrefsConfig {
    /// Open the configured backend, resolving paths against [`default_dir`].
    pub fn open_backend(&self, app: &str) -> Result<Box<dyn Backend>, ConfigError> {
        self.backend.open(default_dir(app).as_deref())
    }

    pub fn open_manager(&self, tree: &PreferenceTree, app: &str) -> Result<PreferenceManager, ConfigError> {
        let backend = self.open_backend(app)?;
        let manager = PreferenceManager::with_storage(tree, self.prefix.clone(), Storage::from_boxed(backend))?;
        Ok(manager)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = PrefsConfig::from_toml("").unwrap();
        assert_eq!(config, PrefsConfig::default());
        assert_eq!(config.backend, BackendConfig::Json { path: None });
    }

    #[test]
    fn test_sqlite_backend() {
        let input = r#"
prefix = "myapp."

[backend]
kind = "sqlite"
path = "/var/lib/myapp/prefs.db"
"#;
        let config = PrefsConfig::from_toml(input).unwrap();
        assert_eq!(config.prefix, "myapp.");
        assert_eq!(
            config.backend,
            BackendConfig::Sqlite {
                path: Some(PathBuf::from("/var/lib/myapp/prefs.db"))
            }
        );
    }

    #[test]
    fn test_memory_backend_with_quota() {
        let input = r#"
[backend]
kind = "memory"
quota_bytes = 4096
"#;
        let config = PrefsConfig::from_toml(input).unwrap();
        assert_eq!(config.backend, BackendConfig::Memory { quota_bytes: Some(4096) });
    }

    #[test]
    fn test_unknown_kind_is_parse_error() {
        let err = PrefsConfig::from_toml("[backend]\nkind = \"redis\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_whitespace_prefix_rejected() {
        let err = PrefsConfig::from_toml("prefix = \"my app.\"\n").unwrap_err();
        assert!(err.to_string().contains("whitespace"), "got: {err}");
    }

    #[test]
    fn test_zero_quota_rejected() {
        let err = PrefsConfig::from_toml("[backend]\nkind = \"memory\"\nquota_bytes = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PrefsConfig {
            prefix: "a.".into(),
            backend: BackendConfig::Memory { quota_bytes: Some(10) },
        };
        let text = config.to_toml().unwrap();
        assert_eq!(PrefsConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_serialize_error_is_not_a_parse_error() {
        // A bare integer is not a TOML document.
        let err = ConfigError::from(toml::to_string(&1).unwrap_err());
        assert!(matches!(err, ConfigError::Serialize(_)));
        assert!(err.to_string().starts_with("cannot serialize config"), "got: {err}");
    }
}
