use thiserror::Error;

/// A preference could not be constructed.
///
/// These are configuration mistakes in how a preference was declared, not
/// runtime data conditions, so they surface at construction and nowhere else.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreferenceError {
    #[error("Empty preference key ({class_name} labelled {label:?}).")]
    EmptyKey { class_name: &'static str, label: String },

    #[error("{value} is not a valid default for {class_name} '{key}': {message}")]
    InvalidDefault {
        class_name: &'static str,
        key: String,
        value: String,
        message: String,
    },

    #[error("minimum value {min} is greater than maximum value {max} for {class_name} '{key}'.")]
    InvertedBounds {
        class_name: &'static str,
        key: String,
        min: f64,
        max: f64,
    },

    #[error("Parameters 'min' and 'max' must be finite numbers, but they were {min} and {max} for {class_name} '{key}'.")]
    NonFiniteBounds {
        class_name: &'static str,
        key: String,
        min: f64,
        max: f64,
    },

    #[error("Parameters 'min' and 'max' must be integers, but they were {min} and {max} for {class_name} '{key}'.")]
    NonIntegerBounds {
        class_name: &'static str,
        key: String,
        min: f64,
        max: f64,
    },

    #[error("Parameter 'minLength' ({min_length}) cannot be greater than 'maxLength' ({max_length}) for {class_name} '{key}'.")]
    InvertedLength {
        class_name: &'static str,
        key: String,
        min_length: usize,
        max_length: usize,
    },

    #[error("options must contain at least two elements, but {class_name} '{key}' has {count}.")]
    TooFewOptions {
        class_name: &'static str,
        key: String,
        count: usize,
    },

    #[error("Multiple options with value {value} in {class_name} '{key}'.")]
    DuplicateOption {
        class_name: &'static str,
        key: String,
        value: String,
    },

    #[error("Option {value} of {class_name} '{key}' is invalid: {message}")]
    InvalidOption {
        class_name: &'static str,
        key: String,
        value: String,
        message: String,
    },
}

/// The first failing constraint's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Failure to turn text into a preference value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseValueError {
    /// The text is not a representation of the value type at all.
    #[error("{0}")]
    Parse(String),
    /// The text parsed, but the value is rejected by a constraint.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
