//! Error types for field schema configuration and decoding.
//!
//! Validation itself never fails: unmet constraints are reported as
//! [`ValidationStatus::Failed`](crate::status::ValidationStatus) entries in
//! the result tree. The errors in this module are raised while a schema is
//! being built, before any `validate()` call.

/// Configuration errors raised while building fields and validator sets.
///
/// These are programming or schema-authoring mistakes and are reported
/// immediately from the constructor or setter that detected them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// No validator in the set implements the type check
    #[error("Field '{field}' requires exactly one type-check validator, none was given")]
    CheckTypeValidatorIsRequired { field: String },

    /// More than one validator claims to be the type check
    #[error("Field '{field}' has more than one type-check validator: {validators:?}")]
    MultipleTypeValidators {
        field: String,
        validators: Vec<String>,
    },

    /// Two validators in one set share a name
    #[error("Validator '{name}' is registered more than once")]
    DuplicateValidator { name: String },

    /// A dependent validator names a validator that is not in the set
    #[error("Validator '{validator}' depends on unknown validator '{dependency}'")]
    UnknownDependency {
        validator: String,
        dependency: String,
    },

    /// A dependent validator names something that cannot be a validator
    #[error("Validator '{validator}' depends on '{dependency}', which is not a validator name")]
    DependencyNotValidator {
        validator: String,
        dependency: String,
    },

    /// Dependent validators form a cycle
    #[error("Dependency cycle detected: {}", path.join(" -> "))]
    DependencyCycle { path: Vec<String> },

    /// Validator names must match `[a-z][a-z0-9_]*`
    #[error("Invalid validator name '{name}'")]
    InvalidValidatorName { name: String },

    /// Field names must be dot-separated identifiers
    #[error("Invalid field name '{name}'")]
    InvalidFieldName { name: String },

    /// Constraint parameters are inconsistent or out of range
    #[error("Invalid constraint '{constraint}' on field '{field}': {message}")]
    InvalidConstraint {
        field: String,
        constraint: String,
        message: String,
    },

    /// A field set already contains a field with this name
    #[error("Field '{name}' is defined more than once")]
    DuplicateField { name: String },

    /// A variant already has a candidate of this kind
    #[error("Variant already has a candidate of kind '{kind}'")]
    DuplicateVariantKind { kind: String },

    /// A composite constraint targets a sub-field that does not exist
    #[error("Composite field '{field}' has no sub-field '{sub_field}'")]
    UnknownSubField { field: String, sub_field: String },

    /// Composite and variant fields only nest atomic fields
    #[error("Field '{field}' cannot be nested here, only atomic fields are allowed")]
    UnsupportedNesting { field: String },
}

/// Top-level error for schema construction and decoding.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Invalid field or validator configuration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No deserializer is registered for the field type tag
    #[error("Unknown field type: {type_name}")]
    UnknownFieldType { type_name: String },

    /// A serialized field carries a different tag than the decoder expects
    #[error("Invalid argument: expected field type '{expected}', got '{actual}'")]
    FieldTypeMismatch { expected: String, actual: String },
}

impl ConfigurationError {
    /// Create an invalid constraint error
    pub fn invalid_constraint(
        field: impl Into<String>,
        constraint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidConstraint {
            field: field.into(),
            constraint: constraint.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate field error
    pub fn duplicate_field(name: impl Into<String>) -> Self {
        Self::DuplicateField { name: name.into() }
    }
}

impl SchemaError {
    /// Create a field type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::FieldTypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an unknown field type error
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        Self::UnknownFieldType {
            type_name: type_name.into(),
        }
    }
}

// Result type aliases for convenience
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
pub type SchemaResult<T> = Result<T, SchemaError>;
