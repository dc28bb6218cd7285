//! Typed field schemas with dependency-ordered constraint validation.
//!
//! Declare named, typed fields, attach constraints, feed them input and get
//! back a structured result tree instead of an error. Misconfiguration (a
//! bad bound, a missing type check, a dependency cycle) fails at
//! construction; validation itself never fails, it reports statuses.
//!
//! # Core Components
//!
//! - [`Field`] - atomic, composite or variant schema node
//! - [`ValidatorSet`] - a field's validators, classified and topologically sorted
//! - [`AggregatedValidationResult`] - result collections with a derived status
//! - [`Schema`] - an ordered set of fields validated together
//! - [`FieldRegistry`] - per-instance map from type tag to decoder
//!
//! # Quick Start
//!
//! ```rust
//! use typed_fields::field::{AtomicField, AtomicKind, DateConstraints};
//! use typed_fields::precision::IsoDuration;
//! use typed_fields::result::Validated;
//! use chrono::NaiveDate;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let weekly = DateConstraints::new()
//!     .with_from(NaiveDate::from_ymd_opt(2025, 2, 20).unwrap())
//!     .with_step("P7D".parse::<IsoDuration>()?);
//! let mut meeting = AtomicField::new("meeting", AtomicKind::Date(weekly))?;
//!
//! assert!(meeting.input(json!("2025-02-27")).passed());
//! assert!(meeting.input(json!("2025-02-25")).failed());
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod field;
pub mod name;
pub mod precision;
pub mod result;
pub mod schema;
pub mod status;
pub mod validator;
pub mod value;

// Re-export commonly used types for convenience
pub use codec::{FieldRegistry, SerializedField};
pub use error::{ConfigurationError, ConfigurationResult, SchemaError, SchemaResult};
pub use field::{AtomicField, AtomicKind, CompositeField, Field, VariantField};
pub use name::{FieldName, ValidatorName};
pub use result::{
    AggregatedValidationResult, CompositeValidationResult, ConstraintValidationResult,
    FieldResult, FieldValidationResult, SchemaValidationResult, Validated,
};
pub use schema::{Schema, SchemaBuilder, SchemaConfig};
pub use status::{Outcome, ValidationStatus};
pub use validator::{Constraint, Validator, ValidatorSet};
pub use value::FieldValue;
