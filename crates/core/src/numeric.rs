//! Numeric preferences.
//!
//! All numeric values are `f64`. Integer preferences hold integral `f64`s so
//! that a stored `3.7` or `NaN` is representable, reported as invalid and
//! repaired, rather than failing to decode.
//!
//! [`NumericPolicy`] carries the rules shared by the plain and the range
//! variants; the range variants compose it instead of extending a parent.

use crate::constraint::Constraint;
use crate::error::{ParseValueError, PreferenceError};
use crate::preference::{
    impl_preference_display, ParseValue, Preference, PreferenceBase, PreferenceData, PreferenceKind,
};

/// Integral/finite rules for a numeric preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericPolicy {
    /// Values must be whole numbers.
    pub integer: bool,
    /// ±Infinity is allowed. NaN never is.
    pub infinite: bool,
}

impl NumericPolicy {
    pub const fn integer() -> Self {
        Self { integer: true, infinite: false }
    }

    pub const fn double() -> Self {
        Self { integer: false, infinite: false }
    }

    pub const fn unbounded(self) -> Self {
        Self { infinite: true, ..self }
    }

    /// Structural constraints, in the order they are reported.
    pub fn constraints(&self) -> Vec<Constraint<f64>> {
        let mut constraints = vec![Constraint::new(
            |v: &f64| !v.is_nan(),
            |_| "NaN is not a number.".to_string(),
        )];
        if !self.infinite {
            constraints.push(Constraint::new(
                |v: &f64| v.is_finite(),
                |v| format!("{v} is not a finite number."),
            ));
        }
        if self.integer {
            constraints.push(Constraint::new(
                |v: &f64| v.is_infinite() || v.fract() == 0.0,
                |v| format!("{v} is not an integer."),
            ));
        }
        constraints
    }

    /// Best-effort repair before the variant's own fallback. Halves round up,
    /// so `-2.5` becomes `-2`.
    pub fn repair(&self, value: f64) -> f64 {
        if self.integer {
            round_half_up(value)
        } else {
            value
        }
    }

    /// Parse text without validating it.
    pub fn parse(&self, s: &str) -> Result<f64, ParseValueError> {
        let trimmed = s.trim();
        if self.integer {
            if let Ok(n) = trimmed.parse::<i64>() {
                return Ok(n as f64);
            }
            match trimmed.parse::<f64>() {
                // Beyond i64, still an integer literal.
                Ok(n) if is_digits(trimmed) => Ok(n),
                Ok(n) if self.infinite && n.is_infinite() => Ok(n),
                _ => Err(ParseValueError::Parse(format!("{s:?} is not an integer."))),
            }
        } else {
            trimmed
                .parse::<f64>()
                .map_err(|_| ParseValueError::Parse(format!("{s:?} is not a number.")))
        }
    }
}

fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn is_digits(s: &str) -> bool {
    let digits = s.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parse with `policy`, then validate against `preference`.
pub(crate) fn parse_and_validate<P>(preference: &P, policy: &NumericPolicy, s: &str) -> Result<f64, ParseValueError>
where
    P: Preference<Value = f64>,
{
    let value = policy.parse(s)?;
    preference.validate(&value).map_err(ParseValueError::Invalid)?;
    Ok(value)
}

// ============================================================================
// Integer
// ============================================================================

/// A whole number. Repair rounds, then falls back to the default.
#[derive(Debug, Clone)]
pub struct IntegerPreference {
    base: PreferenceBase<f64>,
    policy: NumericPolicy,
}

impl IntegerPreference {
    pub const CLASS_NAME: &'static str = "IntegerPreference";

    pub fn new(data: PreferenceData<f64>) -> Result<Self, PreferenceError> {
        Self::with_policy(data, NumericPolicy::integer())
    }

    /// Like [`IntegerPreference::new`], but ±Infinity is a legal value.
    pub fn infinite(data: PreferenceData<f64>) -> Result<Self, PreferenceError> {
        Self::with_policy(data, NumericPolicy::integer().unbounded())
    }

    fn with_policy(data: PreferenceData<f64>, policy: NumericPolicy) -> Result<Self, PreferenceError> {
        Ok(Self {
            base: PreferenceBase::build(Self::CLASS_NAME, data, policy.constraints())?,
            policy,
        })
    }

    pub fn policy(&self) -> NumericPolicy {
        self.policy
    }
}

impl Preference for IntegerPreference {
    type Value = f64;

    fn base(&self) -> &PreferenceBase<f64> {
        &self.base
    }

    fn kind(&self) -> PreferenceKind {
        PreferenceKind::Integer
    }

    fn from_invalid(&self, value: f64) -> f64 {
        self.policy.repair(value)
    }
}

impl ParseValue for IntegerPreference {
    fn parse_value(&self, s: &str) -> Result<f64, ParseValueError> {
        parse_and_validate(self, &self.policy, s)
    }
}

// ============================================================================
// Double
// ============================================================================

/// A finite floating-point number. Repair falls back to the default.
#[derive(Debug, Clone)]
pub struct DoublePreference {
    base: PreferenceBase<f64>,
    policy: NumericPolicy,
}

impl DoublePreference {
    pub const CLASS_NAME: &'static str = "DoublePreference";

    pub fn new(data: PreferenceData<f64>) -> Result<Self, PreferenceError> {
        Self::with_policy(data, NumericPolicy::double())
    }

    /// Like [`DoublePreference::new`], but ±Infinity is a legal value.
    pub fn infinite(data: PreferenceData<f64>) -> Result<Self, PreferenceError> {
        Self::with_policy(data, NumericPolicy::double().unbounded())
    }

    fn with_policy(data: PreferenceData<f64>, policy: NumericPolicy) -> Result<Self, PreferenceError> {
        Ok(Self {
            base: PreferenceBase::build(Self::CLASS_NAME, data, policy.constraints())?,
            policy,
        })
    }

    pub fn policy(&self) -> NumericPolicy {
        self.policy
    }
}

impl Preference for DoublePreference {
    type Value = f64;

    fn base(&self) -> &PreferenceBase<f64> {
        &self.base
    }

    fn kind(&self) -> PreferenceKind {
        PreferenceKind::Double
    }
}

impl ParseValue for DoublePreference {
    fn parse_value(&self, s: &str) -> Result<f64, ParseValueError> {
        parse_and_validate(self, &self.policy, s)
    }
}

impl_preference_display!(IntegerPreference, DoublePreference);

/// Shorthand used by range constructors to report a non-integral bound.
pub(crate) fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0
}
