// Outcome vocabulary for manager calls

use std::fmt;

use prefsmith_io::StoreStatus;

/// What happened on a `get` or `set`. Runtime data problems are reported
/// here, never as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    /// Validation failed. On `get` the value is repaired; on `set` nothing was written.
    InvalidValue,
    /// The stored representation had the wrong shape.
    TypeError,
    /// The stored representation could not be decoded.
    JsonError,
    /// The store itself failed (quota, access denied, I/O).
    StorageError,
}

impl Status {
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::InvalidValue => "INVALID_VALUE",
            Status::TypeError => "TYPE_ERROR",
            Status::JsonError => "JSON_ERROR",
            Status::StorageError => "STORAGE_ERROR",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absence is the normal initial condition, so it maps to `Ok`.
impl From<StoreStatus> for Status {
    fn from(status: StoreStatus) -> Self {
        match status {
            StoreStatus::Ok | StoreStatus::Absent => Status::Ok,
            StoreStatus::TypeError => Status::TypeError,
            StoreStatus::JsonError => Status::JsonError,
            StoreStatus::StorageError => Status::StorageError,
        }
    }
}

/// Result of a `get` or `set`: always carries a usable value.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub status: Status,
    pub value: T,
    /// The persisted value, when `get` found one that failed validation.
    pub saved: Option<T>,
}

impl<T> Response<T> {
    pub fn new(status: Status, value: T) -> Self {
        Self {
            status,
            value,
            saved: None,
        }
    }

    pub(crate) fn repaired(value: T, saved: T) -> Self {
        Self {
            status: Status::InvalidValue,
            value,
            saved: Some(saved),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}
