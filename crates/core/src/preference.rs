//! The base preference protocol.
//!
//! Every variant wraps a [`PreferenceBase`] and implements [`Preference`].
//! Construction goes through [`PreferenceBase::build`], which is the only
//! place a preference can come into existence:
//!
//! 1. reject an empty key,
//! 2. merge the variant's structural constraints ahead of the caller's,
//! 3. validate the default against the full chain.
//!
//! Variant-specific parameters (bounds, options, lengths) are checked by the
//! variant's constructor before step 1 runs.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::constraint::{self, Constraint};
use crate::dependency::Dependency;
use crate::error::{ParseValueError, PreferenceError, ValidationError};
use crate::extras::{ExtraValue, Extras};

/// Types a preference can hold. Persisted as JSON by the storage layer.
pub trait PrefValue: Clone + PartialEq + Debug + Serialize + DeserializeOwned + 'static {}

impl<T> PrefValue for T where T: Clone + PartialEq + Debug + Serialize + DeserializeOwned + 'static {}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a constructed preference.
///
/// Distinct from the key: two preferences declared with the same key (for two
/// different managers, say) are still different preferences. Clones share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreferenceId(u64);

impl PreferenceId {
    fn next() -> Self {
        PreferenceId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Variant discriminant, for callers that render or group preferences by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKind {
    Boolean,
    Integer,
    Double,
    IntegerRange,
    DoubleRange,
    String,
    Multichoice,
    List,
    Dictionary,
    Custom,
}

/// Declaration of a preference, before validation.
#[derive(Debug, Clone)]
pub struct PreferenceData<T> {
    pub key: String,
    pub label: String,
    pub description: String,
    pub default: T,
    pub constraints: Vec<Constraint<T>>,
    pub dependencies: Vec<Dependency>,
    pub extras: Extras,
}

impl<T> PreferenceData<T> {
    pub fn new(key: impl Into<String>, default: T) -> Self {
        Self {
            key: key.into(),
            label: String::new(),
            description: String::new(),
            default,
            constraints: Vec::new(),
            dependencies: Vec::new(),
            extras: Extras::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a caller constraint. Runs after the variant's own constraints.
    pub fn with_constraint(mut self, constraint: Constraint<T>) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<ExtraValue>) -> Self {
        self.extras.insert(name.into(), value.into());
        self
    }
}

/// The validated, immutable state every variant shares.
#[derive(Debug, Clone)]
pub struct PreferenceBase<T> {
    id: PreferenceId,
    class_name: &'static str,
    key: String,
    label: String,
    description: String,
    default: T,
    constraints: Arc<[Constraint<T>]>,
    dependencies: Arc<[Dependency]>,
    extras: Arc<Extras>,
}

impl<T> PreferenceBase<T> {
    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<T: PrefValue> PreferenceBase<T> {
    /// Validate `data` and freeze it.
    ///
    /// `builtin` constraints are placed ahead of the caller's so structural
    /// invariants are reported before domain-specific ones.
    pub fn build(
        class_name: &'static str,
        data: PreferenceData<T>,
        builtin: Vec<Constraint<T>>,
    ) -> Result<Self, PreferenceError> {
        if data.key.is_empty() {
            return Err(PreferenceError::EmptyKey {
                class_name,
                label: data.label,
            });
        }

        let mut constraints = builtin;
        constraints.extend(data.constraints);

        if let Err(e) = constraint::check_all(&constraints, &data.default) {
            return Err(PreferenceError::InvalidDefault {
                class_name,
                key: data.key,
                value: describe_value(&data.default),
                message: e.message,
            });
        }

        Ok(Self {
            id: PreferenceId::next(),
            class_name,
            key: data.key,
            label: data.label,
            description: data.description,
            default: data.default,
            constraints: constraints.into(),
            dependencies: data.dependencies.into(),
            extras: Arc::new(data.extras),
        })
    }

    pub fn validate(&self, value: &T) -> Result<(), ValidationError> {
        constraint::check_all(&self.constraints, value)
    }
}

/// A named, typed, validated value descriptor.
pub trait Preference: Clone + fmt::Display + 'static {
    type Value: PrefValue;

    fn base(&self) -> &PreferenceBase<Self::Value>;

    fn kind(&self) -> PreferenceKind;

    /// Repair for a value that failed validation. Defaults to the default.
    ///
    /// The result does not need to be valid; [`Preference::to_valid`] falls
    /// back to the default if it is not.
    fn from_invalid(&self, _value: Self::Value) -> Self::Value {
        self.default().clone()
    }

    /// Runs the constraint chain; the first failure's message wins.
    fn validate(&self, value: &Self::Value) -> Result<(), ValidationError> {
        self.base().validate(value)
    }

    /// Deterministic repair. Identity on valid input; always returns a valid value.
    fn to_valid(&self, value: Self::Value) -> Self::Value {
        if self.validate(&value).is_ok() {
            return value;
        }
        let repaired = self.from_invalid(value);
        if self.validate(&repaired).is_ok() {
            repaired
        } else {
            self.default().clone()
        }
    }

    fn id(&self) -> PreferenceId {
        self.base().id
    }

    /// Stable variant name, independent of any runtime type metadata.
    fn class_name(&self) -> &'static str {
        self.base().class_name
    }

    fn key(&self) -> &str {
        &self.base().key
    }

    fn label(&self) -> &str {
        &self.base().label
    }

    fn description(&self) -> &str {
        &self.base().description
    }

    fn default(&self) -> &Self::Value {
        &self.base().default
    }

    fn constraints(&self) -> &[Constraint<Self::Value>] {
        &self.base().constraints
    }

    fn dependencies(&self) -> &[Dependency] {
        &self.base().dependencies
    }

    fn extras(&self) -> &Extras {
        &self.base().extras
    }
}

/// Preferences whose values have a text representation (input fields, CLI flags).
pub trait ParseValue: Preference {
    /// Parse `s` and re-validate. A parse failure is reported separately from
    /// a constraint failure.
    fn parse_value(&self, s: &str) -> Result<Self::Value, ParseValueError>;
}

/// Renders a value for error messages.
pub(crate) fn describe_value<T: Debug>(value: &T) -> String {
    format!("{:?}", value)
}

/// `Display` as `<ClassName> '<key>'` for each listed variant.
macro_rules! impl_preference_display {
    ($($ty:ident $(<$g:ident>)?),* $(,)?) => {
        $(
            impl$(<$g: $crate::preference::PrefValue>)? ::std::fmt::Display for $ty$(<$g>)? {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    write!(f, "{} '{}'", self.base.class_name(), self.base.key())
                }
            }
        )*
    };
}

pub(crate) use impl_preference_display;
