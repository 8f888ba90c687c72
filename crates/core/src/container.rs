// List and dictionary preferences
//
// Structural containers: no built-in constraint. Element- and field-level
// rules are caller constraints, usually lifted with `each` / `each_value`.

use std::collections::BTreeMap;

use crate::constraint::Constraint;
use crate::error::PreferenceError;
use crate::preference::{impl_preference_display, PrefValue, Preference, PreferenceBase, PreferenceData, PreferenceKind};

/// Lift an element constraint to a whole-list constraint.
pub fn each<T: 'static>(element: Constraint<T>) -> Constraint<Vec<T>> {
    let message = element.clone();
    Constraint::new(
        move |items: &Vec<T>| items.iter().all(|item| element.holds(item)),
        move |items| {
            items
                .iter()
                .enumerate()
                .find_map(|(i, item)| message.check(item).err().map(|e| format!("Element {i}: {e}")))
                .unwrap_or_default()
        },
    )
}

/// Lift a field constraint to a whole-dictionary constraint.
pub fn each_value<T: 'static>(field: Constraint<T>) -> Constraint<BTreeMap<String, T>> {
    let message = field.clone();
    Constraint::new(
        move |fields: &BTreeMap<String, T>| fields.values().all(|v| field.holds(v)),
        move |fields| {
            fields
                .iter()
                .find_map(|(k, v)| message.check(v).err().map(|e| format!("Field '{k}': {e}")))
                .unwrap_or_default()
        },
    )
}

/// An ordered list of values.
#[derive(Debug, Clone)]
pub struct ListPreference<T> {
    base: PreferenceBase<Vec<T>>,
}

impl<T: PrefValue> ListPreference<T> {
    pub const CLASS_NAME: &'static str = "ListPreference";

    pub fn new(data: PreferenceData<Vec<T>>) -> Result<Self, PreferenceError> {
        Ok(Self {
            base: PreferenceBase::build(Self::CLASS_NAME, data, Vec::new())?,
        })
    }
}

impl<T: PrefValue> Preference for ListPreference<T> {
    type Value = Vec<T>;

    fn base(&self) -> &PreferenceBase<Vec<T>> {
        &self.base
    }

    fn kind(&self) -> PreferenceKind {
        PreferenceKind::List
    }
}

/// A string-keyed mapping of values.
#[derive(Debug, Clone)]
pub struct DictionaryPreference<T> {
    base: PreferenceBase<BTreeMap<String, T>>,
}

impl<T: PrefValue> DictionaryPreference<T> {
    pub const CLASS_NAME: &'static str = "DictionaryPreference";

    pub fn new(data: PreferenceData<BTreeMap<String, T>>) -> Result<Self, PreferenceError> {
        Ok(Self {
            base: PreferenceBase::build(Self::CLASS_NAME, data, Vec::new())?,
        })
    }
}

impl<T: PrefValue> Preference for DictionaryPreference<T> {
    type Value = BTreeMap<String, T>;

    fn base(&self) -> &PreferenceBase<BTreeMap<String, T>> {
        &self.base
    }

    fn kind(&self) -> PreferenceKind {
        PreferenceKind::Dictionary
    }
}

impl_preference_display!(ListPreference<T>, DictionaryPreference<T>);
