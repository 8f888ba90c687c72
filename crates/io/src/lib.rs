//! Key-value storage for preference values.
//!
//! Backends move raw text. [`Storage`] layers the JSON encoding on top and
//! folds every failure into a [`StoreStatus`] plus a usable value, so callers
//! never see a storage fault as an error.

pub mod backend;
pub mod error;
pub mod json_file;
pub mod memory;
pub mod sqlite;
pub mod storage;

pub use backend::Backend;
pub use error::StoreError;
pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;
pub use storage::{Storage, StoreStatus, Stored};
