// Boolean preferences

use crate::error::PreferenceError;
use crate::preference::{impl_preference_display, Preference, PreferenceBase, PreferenceData, PreferenceKind};

/// An on/off switch. No constraints beyond the caller's.
#[derive(Debug, Clone)]
pub struct BooleanPreference {
    base: PreferenceBase<bool>,
}

impl BooleanPreference {
    pub const CLASS_NAME: &'static str = "BooleanPreference";

    pub fn new(data: PreferenceData<bool>) -> Result<Self, PreferenceError> {
        Ok(Self {
            base: PreferenceBase::build(Self::CLASS_NAME, data, Vec::new())?,
        })
    }
}

impl Preference for BooleanPreference {
    type Value = bool;

    fn base(&self) -> &PreferenceBase<bool> {
        &self.base
    }

    fn kind(&self) -> PreferenceKind {
        PreferenceKind::Boolean
    }
}

impl_preference_display!(BooleanPreference);
