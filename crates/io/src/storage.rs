//! Typed access to a [`Backend`].
//!
//! Values are stored as JSON text. Each call returns a [`Stored`] carrying a
//! status and a value; on any failure the value is the caller's fallback (for
//! reads) or the value passed in (for writes).
//!
//! JSON has no infinities. A bare `f64` infinity is stored as the string
//! `"Infinity"` or `"-Infinity"`; any other value that does not decode back
//! from its own encoding is refused with [`StoreStatus::JsonError`].

use std::any::Any;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::Backend;

/// Outcome of a storage call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreStatus {
    Ok,
    /// Nothing stored under the key.
    Absent,
    /// The stored JSON does not have the expected shape.
    TypeError,
    /// The stored text is not JSON (or the value could not be encoded).
    JsonError,
    /// The backend itself failed.
    StorageError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stored<T> {
    pub status: StoreStatus,
    pub value: T,
}

impl<T> Stored<T> {
    fn new(status: StoreStatus, value: T) -> Self {
        Self { status, value }
    }
}

/// JSON encoding over a boxed backend.
pub struct Storage {
    backend: Box<dyn Backend>,
}

impl Storage {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    pub fn from_boxed(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Read and decode `key`, or hand back `fallback` with the reason.
    pub fn get<T: DeserializeOwned + 'static>(&self, key: &str, fallback: T) -> Stored<T> {
        let text = match self.backend.read(key) {
            Ok(Some(text)) => text,
            Ok(None) => return Stored::new(StoreStatus::Absent, fallback),
            Err(e) => {
                log::warn!("{} storage: cannot read {key:?}: {e}", self.backend.name());
                return Stored::new(StoreStatus::StorageError, fallback);
            }
        };

        let json: serde_json::Value = match serde_json::from_str(&text) {
            Ok(json) => json,
            Err(e) => {
                log::debug!("{} storage: {key:?} is not JSON: {e}", self.backend.name());
                return Stored::new(StoreStatus::JsonError, fallback);
            }
        };

        if let Some(value) = decode_infinity(&json) {
            return Stored::new(StoreStatus::Ok, value);
        }

        match serde_json::from_value(json) {
            Ok(value) => Stored::new(StoreStatus::Ok, value),
            Err(e) => {
                log::debug!("{} storage: {key:?} has the wrong shape: {e}", self.backend.name());
                Stored::new(StoreStatus::TypeError, fallback)
            }
        }
    }

    /// Encode and write `value`. The value is echoed back whatever happens.
    pub fn set<T: Serialize + DeserializeOwned + 'static>(&mut self, key: &str, value: T) -> Stored<T> {
        let text = match encode(&value) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("{} storage: cannot encode {key:?}: {e}", self.backend.name());
                return Stored::new(StoreStatus::JsonError, value);
            }
        };
        // serde_json writes non-finite floats as `null`.
        if let Err(e) = serde_json::from_str::<T>(&text) {
            log::warn!("{} storage: {key:?} would not read back from {text}: {e}", self.backend.name());
            return Stored::new(StoreStatus::JsonError, value);
        }

        match self.backend.write(key, &text) {
            Ok(()) => Stored::new(StoreStatus::Ok, value),
            Err(e) => {
                log::warn!("{} storage: cannot write {key:?}: {e}", self.backend.name());
                Stored::new(StoreStatus::StorageError, value)
            }
        }
    }

    /// Best effort. Failures are logged and otherwise ignored.
    pub fn remove(&mut self, key: &str) {
        if let Err(e) = self.backend.delete(key) {
            log::warn!("{} storage: cannot remove {key:?}: {e}", self.backend.name());
        }
    }
}

const INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";

fn encode<T: Serialize + 'static>(value: &T) -> serde_json::Result<String> {
    match (value as &dyn Any).downcast_ref::<f64>() {
        Some(n) if *n == f64::INFINITY => serde_json::to_string(INFINITY),
        Some(n) if *n == f64::NEG_INFINITY => serde_json::to_string(NEG_INFINITY),
        _ => serde_json::to_string(value),
    }
}

/// The tagged infinity strings, when `T` is `f64`.
fn decode_infinity<T: 'static>(json: &serde_json::Value) -> Option<T> {
    let n = match json.as_str()? {
        INFINITY => f64::INFINITY,
        NEG_INFINITY => f64::NEG_INFINITY,
        _ => return None,
    };
    let boxed: Box<dyn Any> = Box::new(n);
    boxed.downcast::<T>().ok().map(|value| *value)
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").field("backend", &self.backend.name()).finish()
    }
}
