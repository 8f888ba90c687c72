use std::io;
use std::path::PathBuf;

use prefsmith_engine::ManagerError;
use prefsmith_io::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    Parse(String),

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config validation error: {0}")]
    Validation(String),

    /// The configured backend could not be opened.
    #[error("storage: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Manager(#[from] ManagerError),
}
