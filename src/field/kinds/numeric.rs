//! Integer and decimal fields.

use super::Validators;
use crate::error::{ConfigurationError, ConfigurationResult};
use crate::precision::{decimal_scale, decimal_step_outcome, parse_decimal, step_outcome};
use crate::status::Outcome;
use crate::validator::Constraint;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest scale `rust_decimal` can represent.
const MAX_SCALE: u32 = 28;

/// Constraints for whole numbers. `min` and `max` are inclusive.
///
/// `step` is counted from `min`, or from zero when there is no minimum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegerConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<i64>,
}

impl IntegerConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_step(mut self, step: i64) -> Self {
        self.step = Some(step);
        self
    }

    pub(crate) fn validators(&self, field: &str) -> ConfigurationResult<Validators> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(ConfigurationError::invalid_constraint(
                    field,
                    "min",
                    format!("minimum {min} exceeds maximum {max}"),
                ));
            }
        }
        if self.step.is_some_and(|step| step < 0) {
            return Err(ConfigurationError::invalid_constraint(
                field,
                "step",
                "step must not be negative",
            ));
        }

        let mut validators = vec![
            Constraint::type_check(|v| Outcome::check(v.is_i64())).into_validator(),
        ];
        if let Some(min) = self.min {
            validators.push(
                Constraint::builtin("min", move |v| with_i64(v, |n| n >= min)).into_validator(),
            );
        }
        if let Some(max) = self.max {
            validators.push(
                Constraint::builtin("max", move |v| with_i64(v, |n| n <= max)).into_validator(),
            );
        }
        if let Some(step) = self.step {
            let anchor = i128::from(self.min.unwrap_or(0));
            let check = move |v: &serde_json::Value| match v.as_i64() {
                Some(n) => step_outcome(i128::from(n), anchor, i128::from(step)),
                None => Outcome::Skip,
            };
            let constraint = match self.min {
                Some(_) => Constraint::builtin_dependent("step", &["min"], check),
                None => Constraint::builtin("step", check),
            };
            validators.push(constraint.into_validator());
        }
        Ok(validators)
    }
}

/// Constraints for exact decimals, given as numeric strings or JSON numbers.
///
/// `min` and `max` are inclusive; `scale` caps the number of significant
/// fractional digits; `step` is counted from `min`, or from zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecimalConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
}

impl DecimalConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min(mut self, min: Decimal) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: Decimal) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_step(mut self, step: Decimal) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub(crate) fn validators(&self, field: &str) -> ConfigurationResult<Validators> {
        check_decimal_bounds(field, self.min, self.max, self.step, self.scale)?;

        let mut validators = vec![
            Constraint::type_check(|v| Outcome::check(parse_decimal(v).is_some()))
                .into_validator(),
        ];
        if let Some(min) = self.min {
            validators.push(
                Constraint::builtin("min", move |v| with_decimal(v, |d| d >= min))
                    .into_validator(),
            );
        }
        if let Some(max) = self.max {
            validators.push(
                Constraint::builtin("max", move |v| with_decimal(v, |d| d <= max))
                    .into_validator(),
            );
        }
        if let Some(scale) = self.scale {
            validators.push(
                Constraint::builtin("scale", move |v| with_decimal(v, |d| decimal_scale(d) <= scale))
                    .into_validator(),
            );
        }
        if let Some(step) = self.step {
            let anchor = self.min.unwrap_or(Decimal::ZERO);
            let check = move |v: &serde_json::Value| match parse_decimal(v) {
                Some(d) => decimal_step_outcome(d, anchor, step),
                None => Outcome::Skip,
            };
            let constraint = match self.min {
                Some(_) => Constraint::builtin_dependent("step", &["min"], check),
                None => Constraint::builtin("step", check),
            };
            validators.push(constraint.into_validator());
        }
        Ok(validators)
    }
}

/// Shared sanity checks for decimal bounds, also used by money rules.
pub(crate) fn check_decimal_bounds(
    field: &str,
    min: Option<Decimal>,
    max: Option<Decimal>,
    step: Option<Decimal>,
    scale: Option<u32>,
) -> ConfigurationResult<()> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ConfigurationError::invalid_constraint(
                field,
                "min",
                format!("minimum {min} exceeds maximum {max}"),
            ));
        }
    }
    if step.is_some_and(|step| step.is_sign_negative() && !step.is_zero()) {
        return Err(ConfigurationError::invalid_constraint(
            field,
            "step",
            "step must not be negative",
        ));
    }
    if scale.is_some_and(|scale| scale > MAX_SCALE) {
        return Err(ConfigurationError::invalid_constraint(
            field,
            "scale",
            format!("scale cannot exceed {MAX_SCALE}"),
        ));
    }
    Ok(())
}

fn with_i64(value: &serde_json::Value, check: impl FnOnce(i64) -> bool) -> Outcome {
    match value.as_i64() {
        Some(n) => Outcome::check(check(n)),
        None => Outcome::Skip,
    }
}

fn with_decimal(value: &serde_json::Value, check: impl FnOnce(Decimal) -> bool) -> Outcome {
    match parse_decimal(value) {
        Some(d) => Outcome::check(check(d)),
        None => Outcome::Skip,
    }
}
