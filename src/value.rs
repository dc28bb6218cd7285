//! Input and default values and their resolution.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An optional raw value held by a field.
///
/// JSON `null` is treated the same as an absent value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValue {
    raw: Option<Value>,
}

impl FieldValue {
    pub fn new(raw: impl Into<Option<Value>>) -> Self {
        let raw = raw.into().filter(|v| !v.is_null());
        Self { raw }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    pub fn into_raw(self) -> Option<Value> {
        self.raw
    }

    pub fn is_set(&self) -> bool {
        self.raw.is_some()
    }

    /// A new value carrying `default`'s raw value when this one is empty.
    pub fn defaults_to(&self, default: &FieldValue) -> FieldValue {
        match &self.raw {
            Some(_) => self.clone(),
            None => default.clone(),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// Resolve an input against its default: the input when set, else the default.
pub fn resolve_value(input: &FieldValue, default: &FieldValue) -> FieldValue {
    input.defaults_to(default)
}
