//! Fields that take the shape of the first matching candidate.

use super::atomic::AtomicField;
use super::field_set::{FieldSet, Named};
use crate::codec::SerializedField;
use crate::error::{ConfigurationError, ConfigurationResult, SchemaResult};
use crate::name::FieldName;
use crate::result::{
    CompositeValidationResult, ConstraintValidationResult, FieldResult, FieldValidationResult,
    Validated,
};
use crate::value::{FieldValue, resolve_value};
use log::debug;
use serde_json::Value;
use std::collections::HashSet;

/// Outcome of matching a value against a variant's candidates.
#[derive(Debug, Clone)]
pub struct VariantResolution<'a> {
    /// The first candidate whose validation passed.
    pub matched: Option<&'a AtomicField>,
    /// The matched candidate's own result, or an aggregate of every attempted
    /// candidate when none matched.
    pub result: FieldResult,
}

/// A field whose value must satisfy one of several atomic candidates.
///
/// Candidates are tried in declaration order and each must be of a different
/// kind. They are renamed to `<variant>.<kind tag>`.
///
/// ```rust
/// use typed_fields::field::{AtomicField, AtomicKind, PassphraseConstraints, PasswordConstraints, VariantField};
/// use typed_fields::result::Validated;
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut secret = VariantField::new("secret", vec![
///     AtomicField::new("phrase", AtomicKind::Passphrase(PassphraseConstraints::default()))?,
///     AtomicField::new("word", AtomicKind::Password(PasswordConstraints::default()))?,
/// ])?;
/// assert!(secret.input(json!("password")).passed());
/// assert_eq!(secret.matched_field().map(|f| f.tag()), Some("password"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct VariantField {
    name: FieldName,
    optional: bool,
    value: FieldValue,
    default: FieldValue,
    candidates: FieldSet<AtomicField>,
    matched: Option<usize>,
    last_result: Option<FieldResult>,
}

const TYPE: &str = "type";

impl VariantField {
    pub fn new(name: &str, candidates: Vec<AtomicField>) -> ConfigurationResult<Self> {
        let name = FieldName::new(name)?;
        if candidates.is_empty() {
            return Err(ConfigurationError::invalid_constraint(
                name.as_str(),
                "fields",
                "a variant needs at least one candidate",
            ));
        }

        let mut kinds = HashSet::new();
        for candidate in &candidates {
            if !kinds.insert(candidate.tag()) {
                return Err(ConfigurationError::DuplicateVariantKind {
                    kind: candidate.tag().to_string(),
                });
            }
        }

        let candidates = FieldSet::from_fields(candidates.into_iter().map(|mut candidate| {
            let renamed = name.child(candidate.tag());
            candidate.rename(renamed);
            candidate
        }))?;

        Ok(Self {
            name,
            optional: false,
            value: FieldValue::empty(),
            default: FieldValue::empty(),
            candidates,
            matched: None,
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

    pub fn name(&self) -> &FieldName {
        &self.name
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn candidates(&self) -> &FieldSet<AtomicField> {
        &self.candidates
    }

    /// Candidate by kind tag or full name.
    pub fn get_field(&self, name: &str) -> Option<&AtomicField> {
        self.candidates.get(name)
    }

    pub fn resolved_value(&self) -> FieldValue {
        resolve_value(&self.value, &self.default)
    }

    pub fn prefill(&mut self, default: impl Into<FieldValue>) {
        self.default = default.into();
    }

    /// Set the input, resolve it and remember which candidate matched.
    pub fn input(&mut self, value: impl Into<FieldValue>) -> &FieldResult {
        self.value = value.into();
        let resolution = self.resolve();
        let matched = resolution
            .matched
            .and_then(|field| self.position(field.name()));
        let result = resolution.result;
        self.matched = matched;
        self.last_result.insert(result)
    }

    /// Set the input without resolving it. Clears the previous match.
    pub fn input_deferred(&mut self, value: impl Into<FieldValue>) {
        self.value = value.into();
        self.matched = None;
        self.last_result = None;
    }

    /// Candidate adopted by the last [`VariantField::input`].
    pub fn matched_field(&self) -> Option<&AtomicField> {
        self.matched.and_then(|index| self.candidates.iter().nth(index))
    }

    pub fn last_result(&self) -> Option<&FieldResult> {
        self.last_result.as_ref()
    }

    pub fn validate(&self) -> FieldResult {
        self.resolve().result
    }

    /// Match the resolved value against every candidate in order.
    ///
    /// - unset: a single `type` result, skipped when optional, failed otherwise
    /// - not a scalar: a single failed `type` result
    /// - the first candidate whose validation passes is returned as is
    /// - otherwise an aggregate of every candidate's result, which is failed
    pub fn resolve(&self) -> VariantResolution<'_> {
        let resolved = self.resolved_value();
        let Some(value) = resolved.raw() else {
            let status = if self.optional {
                ConstraintValidationResult::skipped(TYPE)
            } else {
                ConstraintValidationResult::failed(TYPE)
            };
            return self.unmatched(FieldValidationResult::new(self.name.as_str(), [status]).into());
        };

        if !is_scalar(value) {
            debug!("Variant '{}' rejected a non-scalar value", self.name);
            let failed = ConstraintValidationResult::failed(TYPE);
            return self.unmatched(FieldValidationResult::new(self.name.as_str(), [failed]).into());
        }

        let mut attempted = Vec::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            let result = candidate.validate_value(Some(value));
            if result.passed() {
                debug!("Variant '{}' matched '{}'", self.name, candidate.name());
                return VariantResolution {
                    matched: Some(candidate),
                    result: result.into(),
                };
            }
            attempted.push(result);
        }

        debug!("Variant '{}' matched none of {} candidates", self.name, attempted.len());
        self.unmatched(CompositeValidationResult::new(self.name.as_str(), attempted).into())
    }

    fn unmatched(&self, result: FieldResult) -> VariantResolution<'_> {
        VariantResolution {
            matched: None,
            result,
        }
    }

    fn position(&self, name: &FieldName) -> Option<usize> {
        self.candidates.iter().position(|c| c.name() == name)
    }

    pub(crate) fn to_serialized(&self) -> SchemaResult<SerializedField> {
        Ok(SerializedField {
            field_type: "variant".to_string(),
            name: self.name.to_string(),
            optional: self.optional,
            value: self.default.raw().cloned(),
            fields: self
                .candidates
                .iter()
                .map(AtomicField::to_serialized)
                .collect::<SchemaResult<Vec<_>>>()?,
            constraints: Default::default(),
        })
    }
}

impl Named for VariantField {
    fn name(&self) -> &FieldName {
        &self.name
    }

    fn rename(&mut self, name: FieldName) {
        self.candidates = self.candidates.prefixed(&name);
        self.name = name;
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}
