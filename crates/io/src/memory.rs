// In-memory backend

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::backend::Backend;
use crate::error::StoreError;

#[derive(Debug, Default)]
struct MemoryState {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
    read_only: bool,
    unreadable: bool,
}

impl MemoryState {
    fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

/// A map held in memory, with optional quota, read-only and unreadable
/// switches.
///
/// Clones share the same map, the way every handle to a browser's local
/// storage sees the same data. Single-threaded: not `Send`.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes (keys plus values) the backend will hold.
    pub fn with_quota(quota_bytes: usize) -> Self {
        let backend = Self::new();
        backend.state.borrow_mut().quota = Some(quota_bytes);
        backend
    }

    /// Reject writes and deletes with `AccessDenied`. Reads still work.
    pub fn set_read_only(&self, read_only: bool) {
        self.state.borrow_mut().read_only = read_only;
    }

    /// Reject reads with `AccessDenied`. Writes are unaffected.
    pub fn set_unreadable(&self, unreadable: bool) {
        self.state.borrow_mut().unreadable = unreadable;
    }

    /// Raw text stored under `key`, bypassing the failure switches.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.state.borrow().entries.get(key).cloned()
    }

    /// Store raw text directly, bypassing quota and read-only checks.
    pub fn insert_raw(&self, key: impl Into<String>, text: impl Into<String>) {
        self.state.borrow_mut().entries.insert(key.into(), text.into());
    }

    pub fn keys(&self) -> Vec<String> {
        self.state.borrow().entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().entries.is_empty()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().entries.clear();
    }
}

impl Backend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let state = self.state.borrow();
        if state.unreadable {
            return Err(StoreError::AccessDenied(format!("cannot read {key:?}: backend is unreadable")));
        }
        Ok(state.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, text: &str) -> Result<(), StoreError> {
        let mut state = self.state.borrow_mut();
        if state.read_only {
            return Err(StoreError::AccessDenied(format!("cannot write {key:?}: backend is read-only")));
        }
        if let Some(quota) = state.quota {
            // Replacing an entry frees its old size first.
            let previous = state.entries.get(key).map_or(0, |old| key.len() + old.len());
            let used = state.used_bytes() - previous;
            let requested = key.len() + text.len();
            if used + requested > quota {
                return Err(StoreError::QuotaExceeded { quota, used, requested });
            }
        }
        state.entries.insert(key.to_string(), text.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        let mut state = self.state.borrow_mut();
        if state.read_only {
            return Err(StoreError::AccessDenied(format!("cannot delete {key:?}: backend is read-only")));
        }
        state.entries.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
