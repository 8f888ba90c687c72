// Bounded numeric preferences

use crate::constraint::Constraint;
use crate::error::{ParseValueError, PreferenceError};
use crate::numeric::{self, NumericPolicy};
use crate::preference::{
    impl_preference_display, ParseValue, Preference, PreferenceBase, PreferenceData, PreferenceKind,
};

/// `min <= value <= max` on top of a [`NumericPolicy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangePolicy {
    pub numeric: NumericPolicy,
    pub min: f64,
    pub max: f64,
}

impl RangePolicy {
    /// Check the bounds themselves. Runs before the default is looked at.
    fn check(&self, class_name: &'static str, key: &str) -> Result<(), PreferenceError> {
        let (min, max) = (self.min, self.max);
        let finite_enough = |b: f64| b.is_finite() || (self.numeric.infinite && b.is_infinite());

        if !finite_enough(min) || !finite_enough(max) {
            return Err(PreferenceError::NonFiniteBounds {
                class_name,
                key: key.to_string(),
                min,
                max,
            });
        }
        if self.numeric.integer {
            let integral = |b: f64| b.is_infinite() || numeric::is_integral(b);
            if !integral(min) || !integral(max) {
                return Err(PreferenceError::NonIntegerBounds {
                    class_name,
                    key: key.to_string(),
                    min,
                    max,
                });
            }
        }
        if min > max {
            return Err(PreferenceError::InvertedBounds {
                class_name,
                key: key.to_string(),
                min,
                max,
            });
        }
        Ok(())
    }

    fn constraints(&self) -> Vec<Constraint<f64>> {
        let (min, max) = (self.min, self.max);
        let mut constraints = self.numeric.constraints();
        constraints.push(Constraint::new(
            move |v: &f64| *v >= min,
            move |v| format!("{v} is less than the minimum value {min}."),
        ));
        constraints.push(Constraint::new(
            move |v: &f64| *v <= max,
            move |v| format!("{v} is greater than the maximum value {max}."),
        ));
        constraints
    }

    /// Clamp into `[min, max]`, then round for integer ranges. NaN lands on `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        let clamped = value.max(self.min).min(self.max);
        self.numeric.repair(clamped)
    }
}

fn build_range(
    class_name: &'static str,
    data: PreferenceData<f64>,
    policy: RangePolicy,
) -> Result<PreferenceBase<f64>, PreferenceError> {
    policy.check(class_name, &data.key)?;
    PreferenceBase::build(class_name, data, policy.constraints())
}

// ============================================================================
// IntegerRange
// ============================================================================

/// A whole number within `[min, max]`. Repair clamps then rounds.
#[derive(Debug, Clone)]
pub struct IntegerRangePreference {
    base: PreferenceBase<f64>,
    policy: RangePolicy,
}

impl IntegerRangePreference {
    pub const CLASS_NAME: &'static str = "IntegerRangePreference";

    pub fn new(data: PreferenceData<f64>, min: f64, max: f64) -> Result<Self, PreferenceError> {
        Self::with_numeric(data, NumericPolicy::integer(), min, max)
    }

    /// Bounds (and values) may be ±Infinity.
    pub fn unbounded(data: PreferenceData<f64>, min: f64, max: f64) -> Result<Self, PreferenceError> {
        Self::with_numeric(data, NumericPolicy::integer().unbounded(), min, max)
    }

    fn with_numeric(data: PreferenceData<f64>, numeric: NumericPolicy, min: f64, max: f64) -> Result<Self, PreferenceError> {
        let policy = RangePolicy { numeric, min, max };
        Ok(Self {
            base: build_range(Self::CLASS_NAME, data, policy)?,
            policy,
        })
    }

    pub fn min(&self) -> f64 {
        self.policy.min
    }

    pub fn max(&self) -> f64 {
        self.policy.max
    }
}

impl Preference for IntegerRangePreference {
    type Value = f64;

    fn base(&self) -> &PreferenceBase<f64> {
        &self.base
    }

    fn kind(&self) -> PreferenceKind {
        PreferenceKind::IntegerRange
    }

    fn from_invalid(&self, value: f64) -> f64 {
        self.policy.clamp(value)
    }
}

impl ParseValue for IntegerRangePreference {
    fn parse_value(&self, s: &str) -> Result<f64, ParseValueError> {
        numeric::parse_and_validate(self, &self.policy.numeric, s)
    }
}

// ============================================================================
// DoubleRange
// ============================================================================

/// A number within `[min, max]`. Repair clamps.
#[derive(Debug, Clone)]
pub struct DoubleRangePreference {
    base: PreferenceBase<f64>,
    policy: RangePolicy,
}

impl DoubleRangePreference {
    pub const CLASS_NAME: &'static str = "DoubleRangePreference";

    pub fn new(data: PreferenceData<f64>, min: f64, max: f64) -> Result<Self, PreferenceError> {
        Self::with_numeric(data, NumericPolicy::double(), min, max)
    }

    /// Bounds (and values) may be ±Infinity.
    pub fn unbounded(data: PreferenceData<f64>, min: f64, max: f64) -> Result<Self, PreferenceError> {
        Self::with_numeric(data, NumericPolicy::double().unbounded(), min, max)
    }

    fn with_numeric(data: PreferenceData<f64>, numeric: NumericPolicy, min: f64, max: f64) -> Result<Self, PreferenceError> {
        let policy = RangePolicy { numeric, min, max };
        Ok(Self {
            base: build_range(Self::CLASS_NAME, data, policy)?,
            policy,
        })
    }

    pub fn min(&self) -> f64 {
        self.policy.min
    }

    pub fn max(&self) -> f64 {
        self.policy.max
    }
}

impl Preference for DoubleRangePreference {
    type Value = f64;

    fn base(&self) -> &PreferenceBase<f64> {
        &self.base
    }

    fn kind(&self) -> PreferenceKind {
        PreferenceKind::DoubleRange
    }

    fn from_invalid(&self, value: f64) -> f64 {
        self.policy.clamp(value)
    }
}

impl ParseValue for DoubleRangePreference {
    fn parse_value(&self, s: &str) -> Result<f64, ParseValueError> {
        numeric::parse_and_validate(self, &self.policy.numeric, s)
    }
}

impl_preference_display!(IntegerRangePreference, DoubleRangePreference);

#[cfg(test)]
mod tests {
    use super::*;

    fn number_of_foobars() -> IntegerRangePreference {
        IntegerRangePreference::new(
            PreferenceData::new("number_of_foobars", 5.0)
                .with_label("Number of foobars")
                .with_description("Number of foobars to insert"),
            0.0,
            100.0,
        )
        .unwrap()
    }

    #[test]
    fn test_inverted_bounds() {
        let err = IntegerRangePreference::new(PreferenceData::new("paradox", 5.0), 5.0, 1.0).unwrap_err();
        assert!(matches!(err, PreferenceError::InvertedBounds { .. }));
        assert!(err.to_string().contains("minimum value"));
    }

    #[test]
    fn test_infinite_bounds_need_opt_in() {
        let data = PreferenceData::new("infinite_range", 5.0);
        for err in [
            IntegerRangePreference::new(data.clone(), 0.0, f64::INFINITY).unwrap_err(),
            DoubleRangePreference::new(data.clone(), 0.0, f64::INFINITY).unwrap_err(),
        ] {
            assert!(err.to_string().contains("must be finite numbers"));
        }

        let p = DoubleRangePreference::unbounded(data, 0.0, f64::INFINITY).unwrap();
        assert!(p.validate(&f64::INFINITY).is_ok());
        assert!(p.validate(&-1.0).is_err());
    }

    #[test]
    fn test_nan_bounds_rejected_even_unbounded() {
        let err = DoubleRangePreference::unbounded(PreferenceData::new("r", 0.0), f64::NAN, 1.0).unwrap_err();
        assert!(matches!(err, PreferenceError::NonFiniteBounds { .. }));
    }

    #[test]
    fn test_integer_bounds() {
        let err = IntegerRangePreference::new(PreferenceData::new("r", 1.0), 0.5, 10.0).unwrap_err();
        assert!(matches!(err, PreferenceError::NonIntegerBounds { .. }));
    }

    #[test]
    fn test_nan_default() {
        let data = PreferenceData::new("number_of_foobars", f64::NAN);
        assert!(IntegerRangePreference::new(data.clone(), 0.0, 100.0).unwrap_err().to_string().contains("NaN is not a number"));
        assert!(DoubleRangePreference::new(data, 0.0, 100.0).unwrap_err().to_string().contains("NaN is not a number"));
    }

    #[test]
    fn test_range_messages() {
        let p = number_of_foobars();
        assert_eq!(p.validate(&142.0).unwrap_err().message, "142 is greater than the maximum value 100.");
        assert_eq!(p.validate(&-1.0).unwrap_err().message, "-1 is less than the minimum value 0.");
        assert_eq!(p.validate(&2.5).unwrap_err().message, "2.5 is not an integer.");
    }

    #[test]
    fn test_clamp_then_round() {
        let p = number_of_foobars();
        assert_eq!(p.to_valid(142.0), 100.0);
        assert_eq!(p.to_valid(-7.0), 0.0);
        assert_eq!(p.to_valid(41.6), 42.0);
        assert_eq!(p.to_valid(f64::NEG_INFINITY), 0.0);
        assert_eq!(p.to_valid(42.0), 42.0);

        let d = DoubleRangePreference::new(PreferenceData::new("volume", 0.5), 0.0, 1.0).unwrap();
        assert_eq!(d.to_valid(1.5), 1.0);
        assert_eq!(d.to_valid(0.25), 0.25);
    }

    #[test]
    fn test_parse_reports_range_message() {
        let p = number_of_foobars();
        assert_eq!(p.parse_value("42"), Ok(42.0));
        match p.parse_value("142") {
            Err(ParseValueError::Invalid(e)) => assert!(e.message.contains("maximum value 100")),
            other => panic!("expected range violation, got {:?}", other),
        }
        assert!(matches!(p.parse_value("forty-two"), Err(ParseValueError::Parse(_))));
    }
}
