// Dependencies between preferences

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::preference::{Preference, PreferenceId};

type Condition = Arc<dyn Fn(&dyn Any) -> bool + Send + Sync>;

/// A declarative link to a condition over another preference's value.
///
/// A dependency does not hold a value. Whoever owns the current values (the
/// manager) evaluates the condition on demand, so availability is never cached.
#[derive(Clone)]
pub struct Dependency {
    target: PreferenceId,
    target_key: String,
    condition: Condition,
}

impl Dependency {
    /// Depend on `preference` satisfying `condition`.
    pub fn on<P, F>(preference: &P, condition: F) -> Self
    where
        P: Preference,
        F: Fn(&P::Value) -> bool + Send + Sync + 'static,
    {
        Self {
            target: preference.id(),
            target_key: preference.key().to_string(),
            condition: Arc::new(move |value: &dyn Any| {
                value.downcast_ref::<P::Value>().is_some_and(&condition)
            }),
        }
    }

    /// Depend on `preference` holding exactly `expected`.
    pub fn equals<P>(preference: &P, expected: P::Value) -> Self
    where
        P: Preference,
        P::Value: Send + Sync,
    {
        Self::on(preference, move |v| *v == expected)
    }

    pub fn target(&self) -> PreferenceId {
        self.target
    }

    pub fn target_key(&self) -> &str {
        &self.target_key
    }

    /// Evaluates the condition against the target's current value.
    ///
    /// A value of the wrong type never satisfies the condition.
    pub fn is_satisfied_by(&self, value: &dyn Any) -> bool {
        (self.condition)(value)
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency")
            .field("target", &self.target)
            .field("target_key", &self.target_key)
            .finish_non_exhaustive()
    }
}
