// Constraints: ordered predicate + message pairs

use std::fmt;
use std::sync::Arc;

use crate::error::ValidationError;

type Requirement<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
type Message<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// A reusable requirement on a preference value, with the message reported
/// when the requirement does not hold.
///
/// Both functions must be pure. Cloning is cheap (shared closures).
pub struct Constraint<T> {
    requirement: Requirement<T>,
    message: Message<T>,
}

impl<T> Constraint<T> {
    pub fn new<R, M>(requirement: R, message: M) -> Self
    where
        R: Fn(&T) -> bool + Send + Sync + 'static,
        M: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            requirement: Arc::new(requirement),
            message: Arc::new(message),
        }
    }

    /// Returns true if `value` satisfies the requirement.
    pub fn holds(&self, value: &T) -> bool {
        (self.requirement)(value)
    }

    /// Checks `value`, producing this constraint's message on failure.
    pub fn check(&self, value: &T) -> Result<(), ValidationError> {
        if self.holds(value) {
            Ok(())
        } else {
            Err(ValidationError::new((self.message)(value)))
        }
    }
}

impl<T> Clone for Constraint<T> {
    fn clone(&self) -> Self {
        Self {
            requirement: Arc::clone(&self.requirement),
            message: Arc::clone(&self.message),
        }
    }
}

impl<T> fmt::Debug for Constraint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Constraint { .. }")
    }
}

/// Runs `constraints` in order and reports the first failure.
pub fn check_all<T>(constraints: &[Constraint<T>], value: &T) -> Result<(), ValidationError> {
    constraints.iter().try_for_each(|c| c.check(value))
}
