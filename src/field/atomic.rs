//! Single-valued fields.

use super::field_set::Named;
use super::kinds::AtomicKind;
use crate::codec::SerializedField;
use crate::error::{ConfigurationResult, SchemaError, SchemaResult};
use crate::name::FieldName;
use crate::result::FieldValidationResult;
use crate::validator::{FieldValidator, Validator, ValidatorSet};
use crate::value::{FieldValue, resolve_value};
use log::debug;
use serde_json::Value;
use std::sync::Arc;

/// A field holding one value of a single [`AtomicKind`].
///
/// The kind supplies the type check and the built-in constraints; callers
/// may attach further validators with [`AtomicField::add_constraint`]. Any
/// change to the validators rebuilds the [`ValidatorSet`], so configuration
/// errors surface at the call that introduces them.
///
/// ```rust
/// use typed_fields::field::{AtomicField, AtomicKind, IntegerConstraints};
/// use typed_fields::result::Validated;
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut age = AtomicField::new("age", AtomicKind::Integer(IntegerConstraints::new().with_min(0)))?;
/// assert!(age.input(json!(42)).passed());
/// assert!(age.input(json!(-1)).failed());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AtomicField {
    name: FieldName,
    kind: AtomicKind,
    optional: bool,
    value: FieldValue,
    default: FieldValue,
    extra: Vec<Arc<dyn Validator>>,
    validators: ValidatorSet,
    last_result: Option<FieldValidationResult>,
}

impl AtomicField {
    pub fn new(name: &str, kind: AtomicKind) -> ConfigurationResult<Self> {
        let name = FieldName::new(name)?;
        let validators = build_set(&name, &kind, &[])?;
        Ok(Self {
            name,
            kind,
            optional: false,
            value: FieldValue::empty(),
            default: FieldValue::empty(),
            extra: Vec::new(),
            validators,
            last_result: None,
        })
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_default(mut self, default: impl Into<FieldValue>) -> Self {
        self.prefill(default);
        self
    }

    pub fn with_constraint(mut self, validator: Arc<dyn Validator>) -> ConfigurationResult<Self> {
        self.add_constraint(validator)?;
        Ok(self)
    }

    /// Attach a validator. The field is left unchanged on error.
    pub fn add_constraint(&mut self, validator: Arc<dyn Validator>) -> ConfigurationResult<()> {
        let mut extra = self.extra.clone();
        extra.push(validator);
        self.validators = build_set(&self.name, &self.kind, &extra)?;
        self.extra = extra;
        Ok(())
    }

    pub fn name(&self) -> &FieldName {
        &self.name
    }

    pub fn kind(&self) -> &AtomicKind {
        &self.kind
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn default_value(&self) -> &FieldValue {
        &self.default
    }

    pub fn validators(&self) -> &ValidatorSet {
        &self.validators
    }

    /// The input, or the default when no input was given.
    pub fn resolved_value(&self) -> FieldValue {
        resolve_value(&self.value, &self.default)
    }

    pub fn prefill(&mut self, default: impl Into<FieldValue>) {
        self.default = default.into();
    }

    /// Set the input and validate it straight away.
    pub fn input(&mut self, value: impl Into<FieldValue>) -> &FieldValidationResult {
        self.value = value.into();
        let result = self.validate();
        self.last_result.insert(result)
    }

    /// Set the input without validating it.
    pub fn input_deferred(&mut self, value: impl Into<FieldValue>) {
        self.value = value.into();
        self.last_result = None;
    }

    pub fn validate(&self) -> FieldValidationResult {
        self.validate_value(self.resolved_value().raw())
    }

    /// Validate an arbitrary value with this field's validators, ignoring the
    /// field's own input and default.
    pub fn validate_value(&self, value: Option<&Value>) -> FieldValidationResult {
        self.field_validator().validate(value)
    }

    /// Result of the last [`AtomicField::input`] call.
    pub fn last_result(&self) -> Option<&FieldValidationResult> {
        self.last_result.as_ref()
    }

    pub(crate) fn field_validator(&self) -> FieldValidator<'_> {
        FieldValidator::new(self.name.as_str(), &self.validators, self.optional)
    }

    pub(crate) fn to_serialized(&self) -> SchemaResult<SerializedField> {
        Ok(SerializedField {
            field_type: self.tag().to_string(),
            name: self.name.to_string(),
            optional: self.optional,
            value: self.default.raw().cloned(),
            fields: Vec::new(),
            constraints: self.kind.constraints_json()?,
        })
    }

    /// Rebuild a field from its serialized shape, insisting on the type tag
    /// `expected`.
    pub fn deserialize_as(expected: &str, serialized: SerializedField) -> SchemaResult<Self> {
        if serialized.field_type != expected {
            return Err(SchemaError::type_mismatch(expected, serialized.field_type));
        }
        let kind = AtomicKind::decode(expected, serialized.constraints)?;
        debug!("Decoded {} field '{}'", expected, serialized.name);
        Ok(Self::new(&serialized.name, kind)?
            .with_optional(serialized.optional)
            .with_default(FieldValue::new(serialized.value)))
    }
}

impl Named for AtomicField {
    fn name(&self) -> &FieldName {
        &self.name
    }

    fn rename(&mut self, name: FieldName) {
        self.name = name;
    }
}

fn build_set(
    name: &FieldName,
    kind: &AtomicKind,
    extra: &[Arc<dyn Validator>],
) -> ConfigurationResult<ValidatorSet> {
    let mut validators = kind.validators(name.as_str())?;
    validators.extend(extra.iter().cloned());
    ValidatorSet::new(name.as_str(), validators)
}
