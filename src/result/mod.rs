//! Validation result types.
//!
//! Every result in the tree reports a name and a [`ValidationStatus`].
//! Leaves are [`ConstraintValidationResult`]s; everything above them is an
//! [`AggregatedValidationResult`] whose status is rolled up from its
//! children.
//!
//! # Key Types
//!
//! - [`FieldValidationResult`] - one entry per constraint of a field
//! - [`CompositeValidationResult`] - one entry per sub-field of a composite,
//!   or per attempted candidate of an unmatched variant
//! - [`FieldResult`] - what `Field::validate` returns
//! - [`SchemaValidationResult`] - one entry per field of a schema

mod aggregated;

pub use aggregated::AggregatedValidationResult;

use crate::status::ValidationStatus;
use serde::Serialize;

/// Anything that carries a name and a validation status.
pub trait Validated {
    fn name(&self) -> &str;

    fn status(&self) -> ValidationStatus;

    fn passed(&self) -> bool {
        self.status() == ValidationStatus::Passed
    }

    fn failed(&self) -> bool {
        self.status() == ValidationStatus::Failed
    }

    fn skipped(&self) -> bool {
        self.status() == ValidationStatus::Skipped
    }

    fn pending(&self) -> bool {
        self.status() == ValidationStatus::Pending
    }
}

/// Outcome of one named constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConstraintValidationResult {
    name: String,
    status: ValidationStatus,
}

impl ConstraintValidationResult {
    pub fn new(name: impl Into<String>, status: ValidationStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }

    pub fn passed(name: impl Into<String>) -> Self {
        Self::new(name, ValidationStatus::Passed)
    }

    pub fn failed(name: impl Into<String>) -> Self {
        Self::new(name, ValidationStatus::Failed)
    }

    pub fn skipped(name: impl Into<String>) -> Self {
        Self::new(name, ValidationStatus::Skipped)
    }
}

impl Validated for ConstraintValidationResult {
    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> ValidationStatus {
        self.status
    }
}

pub type FieldValidationResult = AggregatedValidationResult<ConstraintValidationResult>;
pub type CompositeValidationResult = AggregatedValidationResult<FieldValidationResult>;
pub type SchemaValidationResult = AggregatedValidationResult<FieldResult>;

/// Result of validating any kind of field.
///
/// Atomic fields and matched variants produce a `Field` result; composite
/// fields and unmatched variants produce a `Composite` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldResult {
    Field(FieldValidationResult),
    Composite(CompositeValidationResult),
}

impl FieldResult {
    pub fn as_field(&self) -> Option<&FieldValidationResult> {
        match self {
            Self::Field(result) => Some(result),
            Self::Composite(_) => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeValidationResult> {
        match self {
            Self::Composite(result) => Some(result),
            Self::Field(_) => None,
        }
    }

    /// Every constraint result in the tree, depth first.
    pub fn constraints(&self) -> Vec<&ConstraintValidationResult> {
        match self {
            Self::Field(result) => result.iter().collect(),
            Self::Composite(result) => result.iter().flat_map(|f| f.iter()).collect(),
        }
    }
}

impl Validated for FieldResult {
    fn name(&self) -> &str {
        match self {
            Self::Field(result) => result.name(),
            Self::Composite(result) => result.name(),
        }
    }

    fn status(&self) -> ValidationStatus {
        match self {
            Self::Field(result) => result.status(),
            Self::Composite(result) => result.status(),
        }
    }
}

impl From<FieldValidationResult> for FieldResult {
    fn from(result: FieldValidationResult) -> Self {
        Self::Field(result)
    }
}

impl From<CompositeValidationResult> for FieldResult {
    fn from(result: CompositeValidationResult) -> Self {
        Self::Composite(result)
    }
}
