// Enumerated-choice preferences

use serde::{Deserialize, Serialize};

use crate::constraint::{self, Constraint};
use crate::error::PreferenceError;
use crate::preference::{
    describe_value, impl_preference_display, PrefValue, Preference, PreferenceBase, PreferenceData, PreferenceKind,
};

/// One selectable value and how it is shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultichoiceOption<T> {
    pub value: T,
    pub label: String,
}

impl<T> MultichoiceOption<T> {
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Exactly one of a fixed list of options.
///
/// Repair always returns the default: there is no meaningful partial repair
/// for an enumerated choice.
#[derive(Debug, Clone)]
pub struct MultichoicePreference<T> {
    base: PreferenceBase<T>,
    options: Vec<MultichoiceOption<T>>,
}

impl<T: PrefValue + Send + Sync> MultichoicePreference<T> {
    pub const CLASS_NAME: &'static str = "MultichoicePreference";

    pub fn new(data: PreferenceData<T>, options: Vec<MultichoiceOption<T>>) -> Result<Self, PreferenceError> {
        let class_name = Self::CLASS_NAME;

        if options.len() < 2 {
            return Err(PreferenceError::TooFewOptions {
                class_name,
                key: data.key,
                count: options.len(),
            });
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].iter().any(|earlier| earlier.value == option.value) {
                return Err(PreferenceError::DuplicateOption {
                    class_name,
                    key: data.key,
                    value: describe_value(&option.value),
                });
            }
        }
        // Options must satisfy the caller's own constraints, or choosing one
        // would be rejected.
        for option in &options {
            if let Err(e) = constraint::check_all(&data.constraints, &option.value) {
                return Err(PreferenceError::InvalidOption {
                    class_name,
                    key: data.key,
                    value: describe_value(&option.value),
                    message: e.message,
                });
            }
        }

        let allowed: Vec<T> = options.iter().map(|o| o.value.clone()).collect();
        let membership = Constraint::new(
            move |v: &T| allowed.contains(v),
            |v| format!("{} is not among the available options.", describe_value(v)),
        );

        Ok(Self {
            base: PreferenceBase::build(class_name, data, vec![membership])?,
            options,
        })
    }

    pub fn options(&self) -> &[MultichoiceOption<T>] {
        &self.options
    }

    /// Label of the option holding `value`, if any.
    pub fn label_for(&self, value: &T) -> Option<&str> {
        self.options.iter().find(|o| o.value == *value).map(|o| o.label.as_str())
    }
}

impl<T: PrefValue + Send + Sync> Preference for MultichoicePreference<T> {
    type Value = T;

    fn base(&self) -> &PreferenceBase<T> {
        &self.base
    }

    fn kind(&self) -> PreferenceKind {
        PreferenceKind::Multichoice
    }
}

impl_preference_display!(MultichoicePreference<T>);

#[cfg(test)]
mod tests {
    use super::*;

    fn speed_options() -> Vec<MultichoiceOption<String>> {
        vec![
            MultichoiceOption::new("slow".to_string(), "Slow"),
            MultichoiceOption::new("normal".to_string(), "Normal"),
            MultichoiceOption::new("fast".to_string(), "Fast"),
        ]
    }

    #[test]
    fn test_too_few_options() {
        let err = MultichoicePreference::new(
            PreferenceData::new("dprk_election", "kim".to_string()).with_label("Cast your vote"),
            vec![MultichoiceOption::new("kim".to_string(), "Kim")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("two elements"));
    }

    #[test]
    fn test_default_not_an_option() {
        let err = MultichoicePreference::new(
            PreferenceData::new("colors", "panda".to_string()),
            vec![
                MultichoiceOption::new("red".to_string(), "Red"),
                MultichoiceOption::new("blue".to_string(), "Blue"),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, PreferenceError::InvalidDefault { .. }));
        assert!(err.to_string().contains("available options"));
    }

    #[test]
    fn test_duplicate_options() {
        let err = MultichoicePreference::new(
            PreferenceData::new("colors", "red".to_string()),
            vec![
                MultichoiceOption::new("red".to_string(), "Red"),
                MultichoiceOption::new("red".to_string(), "Blue"),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("Multiple options"));
    }

    #[test]
    fn test_options_checked_against_caller_constraints() {
        let err = MultichoicePreference::new(
            PreferenceData::new("level", 1.0)
                .with_constraint(Constraint::new(|v: &f64| *v < 3.0, |v| format!("{v} is too high."))),
            vec![MultichoiceOption::new(1.0, "Low"), MultichoiceOption::new(5.0, "High")],
        )
        .unwrap_err();
        assert!(matches!(err, PreferenceError::InvalidOption { .. }));
        assert!(err.to_string().contains("5 is too high."));
    }

    #[test]
    fn test_repair_is_always_default() {
        let p = MultichoicePreference::new(PreferenceData::new("speed", "normal".to_string()), speed_options()).unwrap();
        assert_eq!(p.to_valid("warp".to_string()), "normal");
        assert_eq!(p.to_valid("fast".to_string()), "fast");
        assert_eq!(p.label_for(&"fast".to_string()), Some("Fast"));
        assert_eq!(p.to_string(), "MultichoicePreference 'speed'");
    }
}
