//! Text, email and choice fields.

use super::{Validators, string_type};
use crate::error::{ConfigurationError, ConfigurationResult};
use crate::status::Outcome;
use crate::validator::Constraint;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Constraints for free text.
///
/// Lengths count Unicode scalar values, not bytes. `pattern` is a regular
/// expression matched anywhere in the value unless it is anchored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl TextConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub(crate) fn validators(&self, field: &str) -> ConfigurationResult<Validators> {
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(ConfigurationError::invalid_constraint(
                    field,
                    "min_length",
                    format!("minimum length {min} exceeds maximum length {max}"),
                ));
            }
        }

        let mut validators = vec![string_type()];
        if let Some(min) = self.min_length {
            validators.push(
                Constraint::builtin("min_length", move |v| {
                    with_str(v, |s| s.chars().count() >= min)
                })
                .into_validator(),
            );
        }
        if let Some(max) = self.max_length {
            validators.push(
                Constraint::builtin("max_length", move |v| {
                    with_str(v, |s| s.chars().count() <= max)
                })
                .into_validator(),
            );
        }
        if let Some(pattern) = &self.pattern {
            let regex = Regex::new(pattern).map_err(|e| {
                ConfigurationError::invalid_constraint(field, "pattern", e.to_string())
            })?;
            validators.push(
                Constraint::builtin("pattern", move |v| with_str(v, |s| regex.is_match(s)))
                    .into_validator(),
            );
        }
        Ok(validators)
    }
}

/// Email addresses: one `@`, a non-empty local part and a dotted domain.
pub(crate) fn email_validators() -> Validators {
    vec![
        Constraint::type_check(|v| match v.as_str() {
            Some(s) => Outcome::check(is_email(s)),
            None => Outcome::Fail,
        })
        .into_validator(),
    ]
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) || value.len() > 254 {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// A closed list of allowed string values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceConstraints {
    pub options: Vec<String>,
}

impl ChoiceConstraints {
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn validators(&self, field: &str) -> ConfigurationResult<Validators> {
        if self.options.is_empty() {
            return Err(ConfigurationError::invalid_constraint(
                field,
                "option",
                "at least one option is required",
            ));
        }
        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return Err(ConfigurationError::invalid_constraint(
                    field,
                    "option",
                    format!("option '{option}' is listed more than once"),
                ));
            }
        }

        let options: HashSet<String> = self.options.iter().cloned().collect();
        Ok(vec![
            string_type(),
            Constraint::builtin("option", move |v| with_str(v, |s| options.contains(s)))
                .into_validator(),
        ])
    }
}

fn with_str(value: &Value, check: impl FnOnce(&str) -> bool) -> Outcome {
    match value.as_str() {
        Some(s) => Outcome::check(check(s)),
        None => Outcome::Skip,
    }
}
