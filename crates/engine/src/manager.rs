//! The preference manager.
//!
//! Owns a cache of last-known values keyed by [`PreferenceId`] and reconciles
//! it with an external store:
//!
//! - `get` asks the store first. A stored value that fails validation is
//!   repaired for the caller and reported as `INVALID_VALUE`; any store
//!   failure degrades to the cached value with a status saying why.
//! - `set` validates before touching anything, updates the cache, then
//!   writes through. A crash between the two leaves the cache ahead of the
//!   store, which the next successful read resolves.
//!
//! Programmer errors (duplicate keys, dangling dependencies, preferences
//! from another manager) are `Err(ManagerError)`. Everything else is a
//! [`Status`].

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use prefsmith_core::{Dependency, Preference, PreferenceId};
use prefsmith_io::{Backend, Storage, StoreStatus};

use crate::error::ManagerError;
use crate::handler::{Action, LogHandler, RequestSummary, ResponseHandler};
use crate::managed::ManagedPreference;
use crate::status::{Response, Status};
use crate::tree::{PreferenceGroup, PreferenceTree};

pub struct PreferenceManager {
    prefix: String,
    storage: Storage,
    /// Flatten order. Shared with the tree the manager was built from.
    entries: Vec<Rc<dyn ManagedPreference>>,
    index: HashMap<PreferenceId, usize>,
    cache: HashMap<PreferenceId, Box<dyn Any>>,
    handler: Box<dyn ResponseHandler>,
}

impl PreferenceManager {
    /// Index `tree` under `prefix` and seed the cache with defaults.
    pub fn new(
        tree: &PreferenceTree,
        prefix: impl Into<String>,
        backend: impl Backend + 'static,
    ) -> Result<Self, ManagerError> {
        Self::with_storage(tree, prefix, Storage::new(backend))
    }

    pub fn with_storage(
        tree: &PreferenceTree,
        prefix: impl Into<String>,
        storage: Storage,
    ) -> Result<Self, ManagerError> {
        let entries = tree.flatten();
        let mut seen = HashSet::new();
        let mut index = HashMap::new();
        let mut cache = HashMap::new();

        for (i, entry) in entries.iter().enumerate() {
            if !seen.insert(entry.key().to_string()) {
                return Err(ManagerError::DuplicateKey {
                    key: entry.key().to_string(),
                });
            }
            index.insert(entry.id(), i);
            cache.insert(entry.id(), entry.default_value());
        }

        // Checked only once everything is seeded, so declaration order is free.
        for entry in &entries {
            let dependent = || format!("{} '{}'", entry.class_name(), entry.key());
            check_dependencies(&cache, entry.dependencies(), dependent)?;
        }
        for group in tree.groups() {
            let dependent = || format!("Group '{}'", group.label());
            check_dependencies(&cache, group.dependencies(), dependent)?;
        }

        let prefix = prefix.into();
        log::debug!(
            "PreferenceManager: {} preferences under prefix {:?} ({} storage)",
            entries.len(),
            prefix,
            storage.backend_name()
        );

        Ok(Self {
            prefix,
            storage,
            entries,
            index,
            cache,
            handler: Box::new(LogHandler),
        })
    }

    /// Replace the default [`LogHandler`].
    pub fn with_handler(mut self, handler: impl ResponseHandler + 'static) -> Self {
        self.handler = Box::new(handler);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Where `preference` lives in the store: prefix followed by key.
    pub fn storage_key<P: Preference>(&self, preference: &P) -> String {
        format!("{}{}", self.prefix, preference.key())
    }

    pub fn contains<P: Preference>(&self, preference: &P) -> bool {
        self.cached(preference).is_ok()
    }

    /// Managed keys in flatten order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.key())
    }

    pub fn preferences(&self) -> &[Rc<dyn ManagedPreference>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current value of `preference`, with how it was obtained.
    pub fn get<P: Preference>(&self, preference: &P) -> Result<Response<P::Value>, ManagerError> {
        let cached = self.cached(preference)?;
        let key = self.storage_key(preference);
        let stored = self.storage.get(&key, preference.default().clone());

        let response = match stored.status {
            StoreStatus::Ok => match preference.validate(&stored.value) {
                Ok(()) => Response::new(Status::Ok, stored.value),
                Err(e) => {
                    log::warn!("{preference}: stored value {:?} rejected: {e}", stored.value);
                    Response::repaired(preference.to_valid(stored.value.clone()), stored.value)
                }
            },
            status => Response::new(Status::from(status), cached.clone()),
        };

        self.notify(Action::Get, preference, response.status);
        Ok(response)
    }

    /// Validate `value`, cache it, then persist it.
    ///
    /// An invalid value is reported as `INVALID_VALUE` and changes nothing.
    pub fn set<P: Preference>(&mut self, preference: &P, value: P::Value) -> Result<Response<P::Value>, ManagerError> {
        self.cached(preference)?;

        if let Err(e) = preference.validate(&value) {
            log::debug!("{preference}: rejected {value:?}: {e}");
            self.notify(Action::Set, preference, Status::InvalidValue);
            return Ok(Response::new(Status::InvalidValue, value));
        }

        self.cache.insert(preference.id(), Box::new(value.clone()));

        let key = self.storage_key(preference);
        let stored = self.storage.set(&key, value);
        let response = Response::new(Status::from(stored.status), stored.value);

        self.notify(Action::Set, preference, response.status);
        Ok(response)
    }

    pub fn reset<P: Preference>(&mut self, preference: &P) -> Result<Response<P::Value>, ManagerError> {
        self.set(preference, preference.default().clone())
    }

    /// Reset every managed preference, in flatten order.
    pub fn reset_all(&mut self) -> Result<Vec<(String, Status)>, ManagerError> {
        let entries = self.entries.clone();
        let mut statuses = Vec::with_capacity(entries.len());
        for entry in &entries {
            let status = entry.reset_in(self)?;
            statuses.push((entry.key().to_string(), status));
        }
        Ok(statuses)
    }

    /// Forget the persisted value. Best effort; the cache returns to the default.
    pub fn remove<P: Preference>(&mut self, preference: &P) -> Result<(), ManagerError> {
        self.cached(preference)?;
        let key = self.storage_key(preference);
        self.storage.remove(&key);
        self.cache.insert(preference.id(), Box::new(preference.default().clone()));
        Ok(())
    }

    /// True when every dependency of `preference` holds for the current
    /// value of its target. Evaluated on each call; nothing is cached.
    pub fn should_be_available<P: Preference>(&self, preference: &P) -> Result<bool, ManagerError> {
        self.cached(preference)?;
        self.dependencies_hold(preference.dependencies(), || preference.to_string())
    }

    /// Same check for a group's dependencies.
    pub fn group_should_be_available(&self, group: &PreferenceGroup) -> Result<bool, ManagerError> {
        self.dependencies_hold(group.dependencies(), || format!("Group '{}'", group.label()))
    }

    fn dependencies_hold(
        &self,
        dependencies: &[Dependency],
        dependent: impl Fn() -> String,
    ) -> Result<bool, ManagerError> {
        for dependency in dependencies {
            let target = self
                .index
                .get(&dependency.target())
                .map(|&i| Rc::clone(&self.entries[i]))
                .ok_or_else(|| ManagerError::UnknownDependency {
                    dependent: dependent(),
                    target: dependency.target_key().to_string(),
                })?;
            let value = target.current_value(self)?;
            if !dependency.is_satisfied_by(&*value) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Membership check plus the cached value.
    fn cached<P: Preference>(&self, preference: &P) -> Result<&P::Value, ManagerError> {
        self.cache
            .get(&preference.id())
            .and_then(|value| value.downcast_ref::<P::Value>())
            .ok_or_else(|| ManagerError::UnknownPreference {
                class_name: preference.class_name(),
                key: preference.key().to_string(),
            })
    }

    fn notify<P: Preference>(&self, action: Action, preference: &P, status: Status) {
        let request = RequestSummary {
            action,
            key: preference.key(),
            class_name: preference.class_name(),
        };
        self.handler.on_response(&request, status);
    }
}

fn check_dependencies(
    cache: &HashMap<PreferenceId, Box<dyn Any>>,
    dependencies: &[Dependency],
    dependent: impl Fn() -> String,
) -> Result<(), ManagerError> {
    for dependency in dependencies {
        if !cache.contains_key(&dependency.target()) {
            return Err(ManagerError::UnknownDependency {
                dependent: dependent(),
                target: dependency.target_key().to_string(),
            });
        }
    }
    Ok(())
}

impl fmt::Debug for PreferenceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceManager")
            .field("prefix", &self.prefix)
            .field("storage", &self.storage)
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefsmith_core::{BooleanPreference, PreferenceData};
    use prefsmith_io::MemoryBackend;

    #[test]
    fn test_cache_keyed_by_identity_not_key() {
        let mine = BooleanPreference::new(PreferenceData::new("flag", false)).unwrap();
        let theirs = BooleanPreference::new(PreferenceData::new("flag", false)).unwrap();
        let manager = PreferenceManager::new(&PreferenceTree::new().preference(mine.clone()), "", MemoryBackend::new())
            .unwrap();

        assert!(manager.contains(&mine));
        assert!(!manager.contains(&theirs));
    }

    #[test]
    fn test_storage_key_is_prefixed() {
        let flag = BooleanPreference::new(PreferenceData::new("flag", false)).unwrap();
        let manager =
            PreferenceManager::new(&PreferenceTree::new().preference(flag.clone()), "app.", MemoryBackend::new())
                .unwrap();
        assert_eq!(manager.storage_key(&flag), "app.flag");
        assert_eq!(manager.prefix(), "app.");
    }
}
