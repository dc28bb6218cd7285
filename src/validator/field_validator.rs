//! Execution order for one field's validators.

use super::{Validator, ValidatorSet};
use crate::result::{ConstraintValidationResult, FieldValidationResult, Validated};
use crate::status::ValidationStatus;
use log::{debug, trace};
use serde_json::Value;
use std::collections::HashMap;

/// Runs a [`ValidatorSet`] against one field's resolved value.
///
/// - optional field without a value: every validator is skipped
/// - required field without a value: the type check fails, the rest are skipped
/// - the type check runs first; if it does not pass, the rest are skipped
/// - independent validators then run unconditionally
/// - dependent validators run in topological order, and only when every
///   validator they depend on passed; otherwise they are skipped, which in
///   turn skips their own dependents
#[derive(Debug, Clone, Copy)]
pub struct FieldValidator<'a> {
    name: &'a str,
    set: &'a ValidatorSet,
    optional: bool,
}

impl<'a> FieldValidator<'a> {
    pub fn new(name: &'a str, set: &'a ValidatorSet, optional: bool) -> Self {
        Self {
            name,
            set,
            optional,
        }
    }

    pub fn validate(&self, resolved: Option<&Value>) -> FieldValidationResult {
        let Some(value) = resolved else {
            if self.optional {
                debug!("Field '{}' is optional and unset, skipping", self.name);
                return self.skip_all();
            }
            debug!("Field '{}' is required and unset", self.name);
            let mut results = vec![ConstraintValidationResult::failed(
                self.set.type_validator().name().as_str(),
            )];
            results.extend(self.skip_constraints());
            return FieldValidationResult::new(self.name, results);
        };

        let type_status = self.run_type(value);
        let mut results = vec![ConstraintValidationResult::new(
            self.set.type_validator().name().as_str(),
            type_status,
        )];
        if type_status != ValidationStatus::Passed {
            results.extend(self.skip_constraints());
        } else {
            results.extend(self.run_constraints(value, false));
        }

        let result = FieldValidationResult::new(self.name, results);
        debug!("Field '{}' validated: {}", self.name, result.status());
        result
    }

    /// Every validator, type check included, recorded as skipped.
    pub fn skip_all(&self) -> FieldValidationResult {
        FieldValidationResult::new(
            self.name,
            self.set
                .iter()
                .map(|v| ConstraintValidationResult::skipped(v.name().as_str())),
        )
    }

    /// Every validator except the type check, recorded as skipped.
    pub fn skip_constraints(&self) -> Vec<ConstraintValidationResult> {
        self.set
            .constraints()
            .map(|v| ConstraintValidationResult::skipped(v.name().as_str()))
            .collect()
    }

    /// Run only the type check.
    pub fn run_type(&self, value: &Value) -> ValidationStatus {
        run(self.name, self.set.type_validator(), value)
    }

    /// Run every validator except the type check, assuming it passed.
    ///
    /// With `stop_on_failure`, the first failing validator causes every
    /// validator after it to be recorded as skipped.
    pub fn run_constraints(&self, value: &Value, stop_on_failure: bool) -> Vec<ConstraintValidationResult> {
        let mut statuses: HashMap<&str, ValidationStatus> = HashMap::new();
        statuses.insert(
            self.set.type_validator().name().as_str(),
            ValidationStatus::Passed,
        );

        let mut results = Vec::with_capacity(self.set.len() - 1);
        let mut halted = false;

        for validator in self.set.independent() {
            let status = if halted {
                ValidationStatus::Skipped
            } else {
                run(self.name, validator.as_ref(), value)
            };
            halted |= stop_on_failure && status == ValidationStatus::Failed;
            statuses.insert(validator.name().as_str(), status);
            results.push(ConstraintValidationResult::new(validator.name().as_str(), status));
        }

        for validator in self.set.dependent() {
            let ready = validator
                .depends_on()
                .unwrap_or_default()
                .iter()
                .all(|d| statuses.get(d.as_str()) == Some(&ValidationStatus::Passed));

            let status = if halted || !ready {
                trace!(
                    "Field '{}': skipping '{}', dependencies not passed",
                    self.name,
                    validator.name()
                );
                ValidationStatus::Skipped
            } else {
                run(self.name, validator.as_ref(), value)
            };
            halted |= stop_on_failure && status == ValidationStatus::Failed;
            statuses.insert(validator.name().as_str(), status);
            results.push(ConstraintValidationResult::new(validator.name().as_str(), status));
        }

        results
    }
}

fn run(field: &str, validator: &dyn Validator, value: &Value) -> ValidationStatus {
    let status = ValidationStatus::from(validator.validate(value));
    trace!("Field '{}': validator '{}' {}", field, validator.name(), status);
    status
}
