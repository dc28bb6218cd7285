//! Concrete atomic field kinds.
//!
//! Each kind pairs a serde-friendly constraint configuration with the
//! validators it generates. Configurations are checked when the validators
//! are built, so a bad bound or an unknown policy fails at construction.

mod numeric;
mod secret;
mod temporal;
mod text;

pub use numeric::{DecimalConstraints, IntegerConstraints};
pub use secret::{
    PassphraseConstraints, PassphrasePolicy, PasswordConstraints, PasswordPolicy, entropy_bits,
};
pub use temporal::{DateConstraints, DateTimeConstraints, DurationConstraints, TimeConstraints};
pub use text::{ChoiceConstraints, TextConstraints};

pub(crate) use numeric::check_decimal_bounds;

use crate::error::{ConfigurationResult, SchemaError, SchemaResult};
use crate::status::Outcome;
use crate::validator::{Constraint, Validator};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;

pub(crate) type Validators = Vec<Arc<dyn Validator>>;

pub(crate) fn string_type() -> Arc<dyn Validator> {
    Constraint::type_check(|v| Outcome::check(v.is_string())).into_validator()
}

/// The kind of an atomic field together with its constraint configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum AtomicKind {
    Text(TextConstraints),
    Email,
    Choice(ChoiceConstraints),
    Boolean,
    Integer(IntegerConstraints),
    Decimal(DecimalConstraints),
    Password(PasswordConstraints),
    Passphrase(PassphraseConstraints),
    Date(DateConstraints),
    Time(TimeConstraints),
    DateTime(DateTimeConstraints),
    Duration(DurationConstraints),
}

impl AtomicKind {
    /// Every atomic type tag, in declaration order.
    pub const TAGS: &'static [&'static str] = &[
        "text",
        "email",
        "choice",
        "boolean",
        "integer",
        "decimal",
        "password",
        "passphrase",
        "date",
        "time",
        "datetime",
        "duration",
    ];

    /// Serialized type tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Email => "email",
            Self::Choice(_) => "choice",
            Self::Boolean => "boolean",
            Self::Integer(_) => "integer",
            Self::Decimal(_) => "decimal",
            Self::Password(_) => "password",
            Self::Passphrase(_) => "passphrase",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::DateTime(_) => "datetime",
            Self::Duration(_) => "duration",
        }
    }

    /// Build the validators for a field of this kind named `field`.
    pub(crate) fn validators(&self, field: &str) -> ConfigurationResult<Validators> {
        match self {
            Self::Text(c) => c.validators(field),
            Self::Email => Ok(text::email_validators()),
            Self::Choice(c) => c.validators(field),
            Self::Boolean => Ok(vec![
                Constraint::type_check(|v| Outcome::check(v.is_boolean())).into_validator(),
            ]),
            Self::Integer(c) => c.validators(field),
            Self::Decimal(c) => c.validators(field),
            Self::Password(c) => Ok(c.validators()),
            Self::Passphrase(c) => c.validators(field),
            Self::Date(c) => c.validators(field),
            Self::Time(c) => c.validators(field),
            Self::DateTime(c) => c.validators(field),
            Self::Duration(c) => c.validators(field),
        }
    }

    /// Constraint configuration as the flat key/value map used in the
    /// serialized field shape.
    pub(crate) fn constraints_json(&self) -> SchemaResult<Map<String, Value>> {
        match self {
            Self::Text(c) => to_map(c),
            Self::Email | Self::Boolean => Ok(Map::new()),
            Self::Choice(c) => to_map(c),
            Self::Integer(c) => to_map(c),
            Self::Decimal(c) => to_map(c),
            Self::Password(c) => to_map(c),
            Self::Passphrase(c) => to_map(c),
            Self::Date(c) => to_map(c),
            Self::Time(c) => to_map(c),
            Self::DateTime(c) => to_map(c),
            Self::Duration(c) => to_map(c),
        }
    }

    /// Rebuild a kind from its tag and flattened constraint keys.
    pub(crate) fn decode(tag: &str, constraints: Map<String, Value>) -> SchemaResult<Self> {
        Ok(match tag {
            "text" => Self::Text(from_map(constraints)?),
            "email" => Self::Email,
            "choice" => Self::Choice(from_map(constraints)?),
            "boolean" => Self::Boolean,
            "integer" => Self::Integer(from_map(constraints)?),
            "decimal" => Self::Decimal(from_map(constraints)?),
            "password" => Self::Password(from_map(constraints)?),
            "passphrase" => Self::Passphrase(from_map(constraints)?),
            "date" => Self::Date(from_map(constraints)?),
            "time" => Self::Time(from_map(constraints)?),
            "datetime" => Self::DateTime(from_map(constraints)?),
            "duration" => Self::Duration(from_map(constraints)?),
            other => return Err(SchemaError::unknown_type(other)),
        })
    }
}

fn to_map<T: Serialize>(constraints: &T) -> SchemaResult<Map<String, Value>> {
    match serde_json::to_value(constraints)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

fn from_map<T: DeserializeOwned>(constraints: Map<String, Value>) -> SchemaResult<T> {
    Ok(serde_json::from_value(Value::Object(constraints))?)
}
