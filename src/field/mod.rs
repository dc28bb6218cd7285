//! Schema nodes: atomic, composite and variant fields.
//!
//! [`Field`] is a closed sum over the three node shapes. Each shape owns its
//! input and default values and produces a fresh result tree on every
//! `validate()` call; only the result of the last `input()` is kept.
//!
//! # Key Types
//!
//! - [`AtomicField`] - one value of one [`AtomicKind`]
//! - [`CompositeField`] - a record of atomic sub-fields, including money
//! - [`VariantField`] - first matching candidate among atomic fields
//! - [`FieldSet`] - ordered, uniquely named fields

mod atomic;
mod composite;
mod field_set;
pub mod kinds;
mod money;
mod variant;

pub use atomic::AtomicField;
pub use composite::{CompositeConstraint, CompositeField, CompositeKind};
pub use field_set::{FieldSet, Named};
pub use kinds::{
    AtomicKind, ChoiceConstraints, DateConstraints, DateTimeConstraints, DecimalConstraints,
    DurationConstraints, IntegerConstraints, PassphraseConstraints, PassphrasePolicy,
    PasswordConstraints, PasswordPolicy, TextConstraints, TimeConstraints,
};
pub use money::{CurrencyRule, MoneyConfig};
pub use variant::{VariantField, VariantResolution};

use crate::codec::SerializedField;
use crate::error::SchemaResult;
use crate::name::FieldName;
use crate::result::FieldResult;
use crate::value::FieldValue;
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum Field {
    Atomic(AtomicField),
    Composite(CompositeField),
    Variant(VariantField),
}

impl Field {
    pub fn name(&self) -> &FieldName {
        match self {
            Self::Atomic(field) => field.name(),
            Self::Composite(field) => field.name(),
            Self::Variant(field) => field.name(),
        }
    }

    /// Serialized type tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Atomic(field) => field.tag(),
            Self::Composite(field) => field.tag(),
            Self::Variant(_) => "variant",
        }
    }

    pub fn is_optional(&self) -> bool {
        match self {
            Self::Atomic(field) => field.is_optional(),
            Self::Composite(field) => field.is_optional(),
            Self::Variant(field) => field.is_optional(),
        }
    }

    pub fn resolved_value(&self) -> FieldValue {
        match self {
            Self::Atomic(field) => field.resolved_value(),
            Self::Composite(field) => field.resolved_value(),
            Self::Variant(field) => field.resolved_value(),
        }
    }

    pub fn prefill(&mut self, default: impl Into<FieldValue>) {
        match self {
            Self::Atomic(field) => field.prefill(default),
            Self::Composite(field) => field.prefill(default),
            Self::Variant(field) => field.prefill(default),
        }
    }

    /// Set the input and validate it straight away.
    pub fn input(&mut self, value: impl Into<FieldValue>) -> FieldResult {
        match self {
            Self::Atomic(field) => field.input(value).clone().into(),
            Self::Composite(field) => field.input(value).clone().into(),
            Self::Variant(field) => field.input(value).clone(),
        }
    }

    /// Set the input without validating it.
    pub fn input_deferred(&mut self, value: impl Into<FieldValue>) {
        match self {
            Self::Atomic(field) => field.input_deferred(value),
            Self::Composite(field) => field.input_deferred(value),
            Self::Variant(field) => field.input_deferred(value),
        }
    }

    pub fn validate(&self) -> FieldResult {
        match self {
            Self::Atomic(field) => field.validate().into(),
            Self::Composite(field) => field.validate().into(),
            Self::Variant(field) => field.validate(),
        }
    }

    /// Result of the last `input` call, if the input has not changed since.
    pub fn last_result(&self) -> Option<FieldResult> {
        match self {
            Self::Atomic(field) => field.last_result().cloned().map(Into::into),
            Self::Composite(field) => field.last_result().cloned().map(Into::into),
            Self::Variant(field) => field.last_result().cloned(),
        }
    }

    /// Nested atomic field by local or full name. Atomic fields have none.
    pub fn get_field(&self, name: &str) -> Option<&AtomicField> {
        match self {
            Self::Atomic(_) => None,
            Self::Composite(field) => field.get_field(name),
            Self::Variant(field) => field.get_field(name),
        }
    }

    pub fn as_atomic(&self) -> Option<&AtomicField> {
        match self {
            Self::Atomic(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeField> {
        match self {
            Self::Composite(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_variant(&self) -> Option<&VariantField> {
        match self {
            Self::Variant(field) => Some(field),
            _ => None,
        }
    }

    pub fn serialize(&self) -> SchemaResult<SerializedField> {
        match self {
            Self::Atomic(field) => field.to_serialized(),
            Self::Composite(field) => field.to_serialized(),
            Self::Variant(field) => field.to_serialized(),
        }
    }

    pub fn to_json(&self) -> SchemaResult<Value> {
        Ok(serde_json::to_value(self.serialize()?)?)
    }
}

impl Named for Field {
    fn name(&self) -> &FieldName {
        Field::name(self)
    }

    fn rename(&mut self, name: FieldName) {
        match self {
            Self::Atomic(field) => field.rename(name),
            Self::Composite(field) => field.rename(name),
            Self::Variant(field) => field.rename(name),
        }
    }
}

impl From<AtomicField> for Field {
    fn from(field: AtomicField) -> Self {
        Self::Atomic(field)
    }
}

impl From<CompositeField> for Field {
    fn from(field: CompositeField) -> Self {
        Self::Composite(field)
    }
}

impl From<VariantField> for Field {
    fn from(field: VariantField) -> Self {
        Self::Variant(field)
    }
}
