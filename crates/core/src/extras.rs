// Presentation metadata attached to preferences and groups

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Caller metadata keyed by name. Never consulted by validation or storage.
pub type Extras = BTreeMap<String, ExtraValue>;

/// A bounded value type for extras.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraValue {
    Bool(bool),
    Number(OrderedFloat<f64>),
    Text(String),
    List(Vec<ExtraValue>),
}

impl ExtraValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ExtraValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ExtraValue::Number(n) => Some(n.into_inner()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExtraValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for ExtraValue {
    fn from(b: bool) -> Self {
        ExtraValue::Bool(b)
    }
}

impl From<f64> for ExtraValue {
    fn from(n: f64) -> Self {
        ExtraValue::Number(OrderedFloat(n))
    }
}

impl From<i64> for ExtraValue {
    fn from(n: i64) -> Self {
        ExtraValue::Number(OrderedFloat(n as f64))
    }
}

impl From<&str> for ExtraValue {
    fn from(s: &str) -> Self {
        ExtraValue::Text(s.to_string())
    }
}

impl From<String> for ExtraValue {
    fn from(s: String) -> Self {
        ExtraValue::Text(s)
    }
}

impl<T: Into<ExtraValue>> From<Vec<T>> for ExtraValue {
    fn from(items: Vec<T>) -> Self {
        ExtraValue::List(items.into_iter().map(Into::into).collect())
    }
}
