//! Record-like fields made of named atomic sub-fields.

use super::atomic::AtomicField;
use super::field_set::{FieldSet, Named};
use super::money::MoneyConfig;
use crate::codec::SerializedField;
use crate::error::{ConfigurationError, ConfigurationResult, SchemaResult};
use crate::name::{FieldName, ValidatorName};
use crate::result::{
    CompositeValidationResult, ConstraintValidationResult, FieldValidationResult, Validated,
};
use crate::status::{Outcome, ValidationStatus};
use crate::validator::Predicate;
use crate::value::{FieldValue, resolve_value};
use log::{debug, trace, warn};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A constraint over a whole composite value, reported against one sub-field.
///
/// The predicate receives the composite's resolved value: an object keyed by
/// sub-field local names. Its result is recorded as
/// `<composite>.<sub_field>.<name>` in that sub-field's results.
#[derive(Clone)]
pub struct CompositeConstraint {
    sub_field: String,
    name: ValidatorName,
    predicate: Predicate,
}

impl CompositeConstraint {
    pub fn new<F>(sub_field: &str, name: &str, predicate: F) -> ConfigurationResult<Self>
    where
        F: Fn(&Value) -> Outcome + Send + Sync + 'static,
    {
        Ok(Self {
            sub_field: sub_field.to_string(),
            name: ValidatorName::new(name)?,
            predicate: Arc::new(predicate),
        })
    }

    pub(crate) fn builtin<F>(sub_field: &str, name: &str, predicate: F) -> Self
    where
        F: Fn(&Value) -> Outcome + Send + Sync + 'static,
    {
        Self {
            sub_field: sub_field.to_string(),
            name: ValidatorName::new_unchecked(name),
            predicate: Arc::new(predicate),
        }
    }

    /// Local name of the sub-field this constraint reports against.
    pub fn sub_field(&self) -> &str {
        &self.sub_field
    }

    pub fn name(&self) -> &ValidatorName {
        &self.name
    }

    pub fn evaluate(&self, composite: &Value) -> Outcome {
        (self.predicate)(composite)
    }
}

impl fmt::Debug for CompositeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeConstraint")
            .field("sub_field", &self.sub_field)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Which flavour of composite this is.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositeKind {
    /// A plain record of caller-chosen sub-fields.
    Record,
    /// An `amount` and a `currency`, checked against per-currency rules.
    Money(MoneyConfig),
}

impl CompositeKind {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Record => "composite",
            Self::Money(_) => "money",
        }
    }
}

/// A field whose value is an object of atomic sub-fields.
///
/// Sub-fields are renamed to `<composite>.<local name>` on construction.
/// Input is distributed by local name; keys without a sub-field are
/// ignored.
#[derive(Debug, Clone)]
pub struct CompositeField {
    name: FieldName,
    kind: CompositeKind,
    optional: bool,
    value: FieldValue,
    default: FieldValue,
    fields: FieldSet<AtomicField>,
    constraints: Vec<CompositeConstraint>,
    last_result: Option<CompositeValidationResult>,
}

/// Per sub-field bookkeeping while a composite is validated.
struct SubFieldRun {
    results: Vec<ConstraintValidationResult>,
    skip: bool,
}

impl CompositeField {
    pub fn new(name: &str, fields: Vec<AtomicField>) -> ConfigurationResult<Self> {
        Self::with_kind(name, CompositeKind::Record, fields, Vec::new())
    }

    pub(crate) fn with_kind(
        name: &str,
        kind: CompositeKind,
        fields: Vec<AtomicField>,
        constraints: Vec<CompositeConstraint>,
    ) -> ConfigurationResult<Self> {
        let name = FieldName::new(name)?;
        let fields = FieldSet::from_fields(fields.into_iter().map(|mut field| {
            let prefixed = field.name().prefixed(&name);
            field.rename(prefixed);
            field
        }))?;
        let mut composite = Self {
            name,
            kind,
            optional: false,
            value: FieldValue::empty(),
            default: FieldValue::empty(),
            fields,
            constraints: Vec::new(),
            last_result: None,
        };
        for constraint in constraints {
            composite.add_constraint(constraint)?;
        }
        Ok(composite)
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_default(mut self, default: impl Into<FieldValue>) -> Self {
        self.prefill(default);
        self
    }

    pub fn with_constraint(mut self, constraint: CompositeConstraint) -> ConfigurationResult<Self> {
        self.add_constraint(constraint)?;
        Ok(self)
    }

    /// Attach a composite constraint. Its sub-field must exist and its name
    /// must be unique among the constraints on that sub-field.
    pub fn add_constraint(&mut self, constraint: CompositeConstraint) -> ConfigurationResult<()> {
        let Some(target) = self.fields.get(&constraint.sub_field) else {
            return Err(ConfigurationError::UnknownSubField {
                field: self.name.to_string(),
                sub_field: constraint.sub_field.clone(),
            });
        };
        let target = target.name().local_name();
        if self
            .constraints
            .iter()
            .any(|c| c.name == constraint.name && self.index_of(&c.sub_field) == self.index_of(target))
        {
            return Err(ConfigurationError::DuplicateValidator {
                name: format!("{}.{}.{}", self.name, target, constraint.name),
            });
        }
        self.constraints.push(constraint);
        Ok(())
    }

    pub fn name(&self) -> &FieldName {
        &self.name
    }

    pub fn kind(&self) -> &CompositeKind {
        &self.kind
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn fields(&self) -> &FieldSet<AtomicField> {
        &self.fields
    }

    pub fn constraints(&self) -> &[CompositeConstraint] {
        &self.constraints
    }

    /// Sub-field by local or full name.
    pub fn get_field(&self, name: &str) -> Option<&AtomicField> {
        self.fields.get(name)
    }

    /// The composite's own value: an object of every sub-field that resolves
    /// to a value, or whatever non-object value was given as input.
    pub fn resolved_value(&self) -> FieldValue {
        let own = resolve_value(&self.value, &self.default);
        if own.raw().is_some_and(|raw| !raw.is_object()) {
            return own;
        }
        FieldValue::new(Value::Object(self.resolved_object()))
    }

    fn resolved_object(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter_map(|field| {
                field
                    .resolved_value()
                    .into_raw()
                    .map(|raw| (field.name().local_name().to_string(), raw))
            })
            .collect()
    }

    /// Set defaults. An object is spread over the sub-fields by local name;
    /// sub-fields without a key keep their own default.
    pub fn prefill(&mut self, default: impl Into<FieldValue>) {
        self.default = default.into();
        let spread = spread(self.default.raw());
        for field in self.fields.iter_mut() {
            if let Some(value) = spread.get(field.name().local_name()) {
                field.prefill(value.clone());
            }
        }
    }

    /// Set the input and validate it straight away.
    pub fn input(&mut self, value: impl Into<FieldValue>) -> &CompositeValidationResult {
        self.input_deferred(value);
        let result = self.validate();
        self.last_result.insert(result)
    }

    /// Set the input without validating it.
    pub fn input_deferred(&mut self, value: impl Into<FieldValue>) {
        self.value = value.into();
        self.last_result = None;
        let spread = spread(self.value.raw());
        for field in self.fields.iter_mut() {
            field.input_deferred(lookup(&spread, field));
        }
    }

    pub fn last_result(&self) -> Option<&CompositeValidationResult> {
        self.last_result.as_ref()
    }

    /// Validate every sub-field, in four stages:
    ///
    /// 1. an optional composite with no sub-field value, or a non-object
    ///    value, skips everything
    /// 2. each sub-field's type check runs; a failure or a missing value
    ///    skips the rest of that sub-field
    /// 3. composite constraints run against the whole value; a failure skips
    ///    the sub-field's own constraints
    /// 4. each remaining sub-field's own constraints run, stopping at the
    ///    first failure
    ///
    /// The result holds one entry per sub-field.
    pub fn validate(&self) -> CompositeValidationResult {
        let own = resolve_value(&self.value, &self.default);
        let type_passed = own.raw().is_none_or(Value::is_object);
        let any_set = self.fields.iter().any(|f| f.resolved_value().is_set());

        if !type_passed || (self.optional && !any_set) {
            debug!(
                "Composite '{}' skipped (type check passed: {}, any value: {})",
                self.name, type_passed, any_set
            );
            return self.skip_all();
        }

        let values: Vec<FieldValue> = self.fields.iter().map(AtomicField::resolved_value).collect();
        let mut runs: Vec<SubFieldRun> = self
            .fields
            .iter()
            .zip(&values)
            .map(|(field, value)| type_run(field, value.raw()))
            .collect();

        let whole = Value::Object(self.resolved_object());
        for constraint in &self.constraints {
            let Some(index) = self.index_of(&constraint.sub_field) else {
                continue;
            };
            let run = &mut runs[index];
            let status = if run.skip {
                ValidationStatus::Skipped
            } else {
                ValidationStatus::from(constraint.evaluate(&whole))
            };
            trace!(
                "Composite '{}': constraint '{}.{}' {}",
                self.name, constraint.sub_field, constraint.name, status
            );
            run.skip |= status == ValidationStatus::Failed;
            run.results.push(ConstraintValidationResult::new(
                self.qualified(index, constraint),
                status,
            ));
        }

        let results = self
            .fields
            .iter()
            .zip(&values)
            .zip(runs)
            .map(|((field, value), mut run)| {
                let validator = field.field_validator();
                match value.raw() {
                    Some(raw) if !run.skip => run.results.extend(validator.run_constraints(raw, true)),
                    _ => run.results.extend(validator.skip_constraints()),
                }
                FieldValidationResult::new(field.name().as_str(), run.results)
            });

        let result = CompositeValidationResult::new(self.name.as_str(), results);
        debug!("Composite '{}' validated: {}", self.name, result.status());
        result
    }

    fn skip_all(&self) -> CompositeValidationResult {
        let results = self.fields.iter().enumerate().map(|(index, field)| {
            let validator = field.field_validator();
            let mut results = vec![ConstraintValidationResult::skipped(
                field.validators().type_validator().name().as_str(),
            )];
            results.extend(
                self.constraints
                    .iter()
                    .filter(|c| self.index_of(&c.sub_field) == Some(index))
                    .map(|c| ConstraintValidationResult::skipped(self.qualified(index, c))),
            );
            results.extend(validator.skip_constraints());
            FieldValidationResult::new(field.name().as_str(), results)
        });
        CompositeValidationResult::new(self.name.as_str(), results)
    }

    fn index_of(&self, sub_field: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name().local_name() == sub_field || f.name().as_str() == sub_field)
    }

    fn qualified(&self, index: usize, constraint: &CompositeConstraint) -> String {
        let field = self.fields.iter().nth(index).map(|f| f.name().local_name());
        format!(
            "{}.{}.{}",
            self.name,
            field.unwrap_or(&constraint.sub_field),
            constraint.name
        )
    }

    /// Money constraints are rebuilt from the currency rules on decode; record
    /// constraints are closures and are left out.
    pub(crate) fn to_serialized(&self) -> SchemaResult<SerializedField> {
        if matches!(self.kind, CompositeKind::Record) && !self.constraints.is_empty() {
            warn!(
                "Composite '{}': {} cross-field constraint(s) cannot be serialized and are dropped",
                self.name,
                self.constraints.len()
            );
        }
        let constraints = match &self.kind {
            CompositeKind::Record => Map::new(),
            CompositeKind::Money(config) => config.to_map()?,
        };
        let fields = match &self.kind {
            CompositeKind::Record => self
                .fields
                .iter()
                .map(AtomicField::to_serialized)
                .collect::<SchemaResult<Vec<_>>>()?,
            CompositeKind::Money(_) => Vec::new(),
        };
        Ok(SerializedField {
            field_type: self.tag().to_string(),
            name: self.name.to_string(),
            optional: self.optional,
            value: self.default.raw().cloned(),
            fields,
            constraints,
        })
    }
}

impl Named for CompositeField {
    fn name(&self) -> &FieldName {
        &self.name
    }

    fn rename(&mut self, name: FieldName) {
        self.fields = self.fields.prefixed(&name);
        self.name = name;
    }
}

fn type_run(field: &AtomicField, value: Option<&Value>) -> SubFieldRun {
    let type_name = field.validators().type_validator().name().as_str();
    let status = match value {
        Some(raw) => field.field_validator().run_type(raw),
        None if field.is_optional() => ValidationStatus::Skipped,
        None => ValidationStatus::Failed,
    };
    SubFieldRun {
        results: vec![ConstraintValidationResult::new(type_name, status)],
        skip: status != ValidationStatus::Passed,
    }
}

fn spread(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

fn lookup(values: &Map<String, Value>, field: &AtomicField) -> FieldValue {
    FieldValue::new(values.get(field.name().local_name()).cloned())
}
