// Preference configuration
// Loaded from a TOML file; picks the key prefix and the storage backend.

pub mod backend;
pub mod error;
pub mod prefs;

pub use backend::BackendConfig;
pub use error::ConfigError;
pub use prefs::{default_dir, PrefsConfig};
