//! Validated names for fields and validators.

use crate::error::{ConfigurationError, ConfigurationResult};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

static VALIDATOR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("validator name pattern"));

static FIELD_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("field segment pattern"));

/// Name of a validator within one field, e.g. `min_length`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidatorName(String);

impl ValidatorName {
    /// Name of the type-check validator every field carries.
    pub const TYPE: &'static str = "type";

    pub fn new(value: impl Into<String>) -> ConfigurationResult<Self> {
        let value = value.into();
        if !Self::is_valid(&value) {
            return Err(ConfigurationError::InvalidValidatorName { name: value });
        }
        Ok(Self(value))
    }

    /// Whether `value` matches `[a-z][a-z0-9_]*`.
    pub fn is_valid(value: &str) -> bool {
        VALIDATOR_NAME.is_match(value)
    }

    /// Create a name the crate itself knows to be valid.
    pub(crate) fn new_unchecked(value: &str) -> Self {
        debug_assert!(Self::is_valid(value), "invalid built-in validator name {value}");
        Self(value.to_string())
    }

    pub(crate) fn type_check() -> Self {
        Self::new_unchecked(Self::TYPE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidatorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ValidatorName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ValidatorName {
    type Error = ConfigurationError;

    fn try_from(value: &str) -> ConfigurationResult<Self> {
        Self::new(value)
    }
}

/// Dot-separated path naming a field, e.g. `price.amount`.
///
/// The last segment is the field's local name; the segments before it are
/// the names of the enclosing composite or variant fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldName(String);

impl FieldName {
    pub fn new(value: impl Into<String>) -> ConfigurationResult<Self> {
        let value = value.into();
        if value.is_empty() || !value.split('.').all(|s| FIELD_SEGMENT.is_match(s)) {
            return Err(ConfigurationError::InvalidFieldName { name: value });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment.
    pub fn local_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// `prefix.local_name`, dropping whatever prefix this name had before.
    pub fn prefixed(&self, prefix: &FieldName) -> FieldName {
        FieldName(format!("{}.{}", prefix.0, self.local_name()))
    }

    /// `self.child`, where `child` is a single segment known to be valid.
    pub(crate) fn child(&self, child: &str) -> FieldName {
        FieldName(format!("{}.{}", self.0, child))
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for FieldName {
    type Error = ConfigurationError;

    fn try_from(value: &str) -> ConfigurationResult<Self> {
        Self::new(value)
    }
}

impl Serialize for FieldName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
