//! Typed, named, validated preference descriptors.
//!
//! A preference is not a value. It describes one: a key, a default, and an
//! ordered chain of constraints the default is checked against at
//! construction. A preference that exists is internally consistent for the
//! lifetime of the process.

pub mod boolean;
pub mod constraint;
pub mod container;
pub mod custom;
pub mod dependency;
pub mod error;
pub mod extras;
pub mod multichoice;
pub mod numeric;
pub mod preference;
pub mod range;
pub mod string;

pub use boolean::BooleanPreference;
pub use constraint::Constraint;
pub use container::{DictionaryPreference, ListPreference};
pub use custom::CustomPreference;
pub use dependency::Dependency;
pub use error::{ParseValueError, PreferenceError, ValidationError};
pub use extras::{ExtraValue, Extras};
pub use multichoice::{MultichoiceOption, MultichoicePreference};
pub use numeric::{DoublePreference, IntegerPreference, NumericPolicy};
pub use preference::{
    ParseValue, PrefValue, Preference, PreferenceBase, PreferenceData, PreferenceId, PreferenceKind,
};
pub use range::{DoubleRangePreference, IntegerRangePreference, RangePolicy};
pub use string::{StringOptions, StringPreference};
