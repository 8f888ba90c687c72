// Type-erased view of a preference

use std::any::Any;

use prefsmith_core::{Dependency, Extras, Preference, PreferenceId, PreferenceKind};

use crate::error::ManagerError;
use crate::manager::PreferenceManager;
use crate::status::Status;

/// What the manager needs from a preference without knowing its value type.
///
/// Values cross this boundary as `Box<dyn Any>` holding the preference's
/// `Value`; downcasting happens only where the concrete type is known again.
pub trait ManagedPreference {
    fn id(&self) -> PreferenceId;

    fn key(&self) -> &str;

    fn label(&self) -> &str;

    fn class_name(&self) -> &'static str;

    fn kind(&self) -> PreferenceKind;

    fn dependencies(&self) -> &[Dependency];

    fn extras(&self) -> &Extras;

    /// The concrete preference, for callers that know its type.
    fn as_any(&self) -> &dyn Any;

    fn default_value(&self) -> Box<dyn Any>;

    /// Current value as `manager.get` reports it.
    fn current_value(&self, manager: &PreferenceManager) -> Result<Box<dyn Any>, ManagerError>;

    fn reset_in(&self, manager: &mut PreferenceManager) -> Result<Status, ManagerError>;
}

/// Wrapper that keeps the erased and typed method sets apart.
pub(crate) struct Managed<P>(pub(crate) P);

impl<P: Preference> ManagedPreference for Managed<P> {
    fn id(&self) -> PreferenceId {
        self.0.id()
    }

    fn key(&self) -> &str {
        self.0.key()
    }

    fn label(&self) -> &str {
        self.0.label()
    }

    fn class_name(&self) -> &'static str {
        self.0.class_name()
    }

    fn kind(&self) -> PreferenceKind {
        self.0.kind()
    }

    fn dependencies(&self) -> &[Dependency] {
        self.0.dependencies()
    }

    fn extras(&self) -> &Extras {
        self.0.extras()
    }

    fn as_any(&self) -> &dyn Any {
        &self.0
    }

    fn default_value(&self) -> Box<dyn Any> {
        Box::new(self.0.default().clone())
    }

    fn current_value(&self, manager: &PreferenceManager) -> Result<Box<dyn Any>, ManagerError> {
        let response = manager.get(&self.0)?;
        Ok(Box::new(response.value))
    }

    fn reset_in(&self, manager: &mut PreferenceManager) -> Result<Status, ManagerError> {
        Ok(manager.reset(&self.0)?.status)
    }
}
