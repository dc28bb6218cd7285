//! Validators and their orchestration.
//!
//! A [`Validator`] is a named, pure predicate over a field's resolved value.
//! Validators that declare [`Validator::depends_on`] are *dependent*: they
//! only run once every validator they name has passed. Exactly one validator
//! per field checks the value's type; it always runs first.
//!
//! # Key Types
//!
//! - [`Validator`] - the predicate capability
//! - [`Constraint`] - closure-backed validator used by every built-in field kind
//! - [`ValidatorSet`] - classified, dependency-checked, topologically sorted validators
//! - [`FieldValidator`] - runs a set against one resolved value

mod field_validator;
mod set;

pub use field_validator::FieldValidator;
pub use set::ValidatorSet;

use crate::error::{ConfigurationError, ConfigurationResult};
use crate::name::ValidatorName;
use crate::status::Outcome;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A named predicate over a resolved field value.
pub trait Validator: fmt::Debug + Send + Sync {
    /// Name reported in the validation result
    fn name(&self) -> &ValidatorName;

    /// Evaluate the predicate against the resolved value
    fn validate(&self, value: &Value) -> Outcome;

    /// Whether this validator is the field's type check
    fn checks_type(&self) -> bool {
        false
    }

    /// Validators that must pass before this one runs.
    ///
    /// `None` marks an independent validator.
    fn depends_on(&self) -> Option<&[ValidatorName]> {
        None
    }
}

/// Shared predicate function backing a [`Constraint`].
pub type Predicate = Arc<dyn Fn(&Value) -> Outcome + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Role {
    TypeCheck,
    Independent,
    Dependent(Vec<ValidatorName>),
}

/// A validator backed by a closure.
///
/// ```rust
/// use typed_fields::status::Outcome;
/// use typed_fields::validator::{Constraint, Validator};
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let even = Constraint::new("even", |v| {
///     v.as_i64().map_or(Outcome::Skip, |n| Outcome::check(n % 2 == 0))
/// })?;
/// assert_eq!(even.validate(&json!(4)), Outcome::Pass);
/// assert_eq!(even.validate(&json!("4")), Outcome::Skip);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Constraint {
    name: ValidatorName,
    role: Role,
    predicate: Predicate,
}

impl Constraint {
    /// An independent constraint.
    pub fn new<F>(name: &str, predicate: F) -> ConfigurationResult<Self>
    where
        F: Fn(&Value) -> Outcome + Send + Sync + 'static,
    {
        Ok(Self {
            name: ValidatorName::new(name)?,
            role: Role::Independent,
            predicate: Arc::new(predicate),
        })
    }

    /// The type check, always named `type`.
    pub fn type_check<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> Outcome + Send + Sync + 'static,
    {
        Self {
            name: ValidatorName::type_check(),
            role: Role::TypeCheck,
            predicate: Arc::new(predicate),
        }
    }

    /// Turn this constraint into a dependent one.
    ///
    /// Every dependency must itself be a well-formed validator name.
    pub fn depending_on(mut self, dependencies: &[&str]) -> ConfigurationResult<Self> {
        let mut names = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            let name = ValidatorName::new(*dependency).map_err(|_| {
                ConfigurationError::DependencyNotValidator {
                    validator: self.name.to_string(),
                    dependency: dependency.to_string(),
                }
            })?;
            names.push(name);
        }
        self.role = Role::Dependent(names);
        Ok(self)
    }

    pub(crate) fn builtin<F>(name: &str, predicate: F) -> Self
    where
        F: Fn(&Value) -> Outcome + Send + Sync + 'static,
    {
        Self {
            name: ValidatorName::new_unchecked(name),
            role: Role::Independent,
            predicate: Arc::new(predicate),
        }
    }

    pub(crate) fn builtin_dependent<F>(name: &str, dependencies: &[&str], predicate: F) -> Self
    where
        F: Fn(&Value) -> Outcome + Send + Sync + 'static,
    {
        Self {
            name: ValidatorName::new_unchecked(name),
            role: Role::Dependent(
                dependencies
                    .iter()
                    .map(|d| ValidatorName::new_unchecked(d))
                    .collect(),
            ),
            predicate: Arc::new(predicate),
        }
    }

    pub fn into_validator(self) -> Arc<dyn Validator> {
        Arc::new(self)
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl Validator for Constraint {
    fn name(&self) -> &ValidatorName {
        &self.name
    }

    fn validate(&self, value: &Value) -> Outcome {
        (self.predicate)(value)
    }

    fn checks_type(&self) -> bool {
        self.role == Role::TypeCheck
    }

    fn depends_on(&self) -> Option<&[ValidatorName]> {
        match &self.role {
            Role::Dependent(names) => Some(names),
            _ => None,
        }
    }
}
