// Preferences validated by an arbitrary predicate

use crate::constraint::Constraint;
use crate::error::PreferenceError;
use crate::preference::{
    describe_value, impl_preference_display, PrefValue, Preference, PreferenceBase, PreferenceData, PreferenceKind,
};

/// Any serde value type, valid exactly when `predicate` holds.
///
/// Repair returns the default.
#[derive(Debug, Clone)]
pub struct CustomPreference<T> {
    base: PreferenceBase<T>,
}

impl<T: PrefValue> CustomPreference<T> {
    pub const CLASS_NAME: &'static str = "CustomPreference";

    pub fn new<F>(data: PreferenceData<T>, predicate: F) -> Result<Self, PreferenceError>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let key = data.key.clone();
        let requirement = Constraint::new(predicate, move |v: &T| {
            format!("{} is not a valid value for {} '{}'.", describe_value(v), Self::CLASS_NAME, key)
        });
        Ok(Self {
            base: PreferenceBase::build(Self::CLASS_NAME, data, vec![requirement])?,
        })
    }
}

impl<T: PrefValue> Preference for CustomPreference<T> {
    type Value = T;

    fn base(&self) -> &PreferenceBase<T> {
        &self.base
    }

    fn kind(&self) -> PreferenceKind {
        PreferenceKind::Custom
    }
}

impl_preference_display!(CustomPreference<T>);

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    fn origin_quadrant() -> CustomPreference<Point> {
        CustomPreference::new(PreferenceData::new("anchor", Point { x: 1, y: 1 }), |p: &Point| p.x >= 0 && p.y >= 0)
            .unwrap()
    }

    #[test]
    fn test_predicate_is_the_requirement() {
        let p = origin_quadrant();
        let err = p.validate(&Point { x: -1, y: 0 }).unwrap_err();
        assert_eq!(err.message, "Point { x: -1, y: 0 } is not a valid value for CustomPreference 'anchor'.");
        assert_eq!(p.to_valid(Point { x: -1, y: 0 }), Point { x: 1, y: 1 });
    }

    #[test]
    fn test_default_must_satisfy_predicate() {
        let err = CustomPreference::new(PreferenceData::new("even", 3i64), |n: &i64| n % 2 == 0).unwrap_err();
        assert!(matches!(err, PreferenceError::InvalidDefault { .. }));
    }
}
