// Text preferences

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constraint::Constraint;
use crate::error::{ParseValueError, PreferenceError};
use crate::preference::{
    impl_preference_display, ParseValue, Preference, PreferenceBase, PreferenceData, PreferenceKind,
};

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").expect("static regex"));

fn has_line_break(s: &str) -> bool {
    s.contains(|c: char| c == '\n' || c == '\r')
}

/// Shape rules for a [`StringPreference`]. Lengths count characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StringOptions {
    pub multiline: bool,
    pub min_length: usize,
    pub max_length: Option<usize>,
}

impl StringOptions {
    pub fn single_line() -> Self {
        Self::default()
    }

    pub fn multiline() -> Self {
        Self {
            multiline: true,
            ..Self::default()
        }
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    fn constraints(&self) -> Vec<Constraint<String>> {
        let mut constraints = Vec::new();
        if !self.multiline {
            constraints.push(Constraint::new(
                |v: &String| !has_line_break(v),
                |_| "Line breaks are not allowed.".to_string(),
            ));
        }
        if self.min_length > 0 {
            let min_length = self.min_length;
            constraints.push(Constraint::new(
                move |v: &String| v.chars().count() >= min_length,
                move |_| format!("Minimum length is {min_length} characters."),
            ));
        }
        if let Some(max_length) = self.max_length {
            constraints.push(Constraint::new(
                move |v: &String| v.chars().count() <= max_length,
                move |_| format!("Maximum length {max_length} exceeded."),
            ));
        }
        constraints
    }
}

/// Free text, optionally single-line and length-limited.
///
/// Repair truncates to `max_length` and, for single-line preferences,
/// replaces each run of line breaks with one space.
#[derive(Debug, Clone)]
pub struct StringPreference {
    base: PreferenceBase<String>,
    options: StringOptions,
}

impl StringPreference {
    pub const CLASS_NAME: &'static str = "StringPreference";

    pub fn new(data: PreferenceData<String>, options: StringOptions) -> Result<Self, PreferenceError> {
        if let Some(max_length) = options.max_length {
            if options.min_length > max_length {
                return Err(PreferenceError::InvertedLength {
                    class_name: Self::CLASS_NAME,
                    key: data.key,
                    min_length: options.min_length,
                    max_length,
                });
            }
        }
        Ok(Self {
            base: PreferenceBase::build(Self::CLASS_NAME, data, options.constraints())?,
            options,
        })
    }

    pub fn options(&self) -> StringOptions {
        self.options
    }

    pub fn is_multiline(&self) -> bool {
        self.options.multiline
    }
}

impl Preference for StringPreference {
    type Value = String;

    fn base(&self) -> &PreferenceBase<String> {
        &self.base
    }

    fn kind(&self) -> PreferenceKind {
        PreferenceKind::String
    }

    fn from_invalid(&self, value: String) -> String {
        let truncated = match self.options.max_length {
            Some(max_length) => value.chars().take(max_length).collect(),
            None => value,
        };
        if self.options.multiline {
            truncated
        } else {
            LINE_BREAKS.replace_all(&truncated, " ").into_owned()
        }
    }
}

impl ParseValue for StringPreference {
    fn parse_value(&self, s: &str) -> Result<String, ParseValueError> {
        let value = s.to_string();
        self.validate(&value)?;
        Ok(value)
    }
}

impl_preference_display!(StringPreference);
