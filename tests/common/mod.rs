//! Common test utilities.
//!
//! Assertion macros for result trees, logger setup and small JSON helpers.

use serde_json::{Map, Value};
use typed_fields::result::Validated;
use typed_fields::status::ValidationStatus;

pub mod fixtures;

/// Assert the status of anything implementing `Validated`.
#[macro_export]
macro_rules! assert_status {
    ($result:expr, $status:ident) => {{
        use typed_fields::result::Validated as _;
        let result = &$result;
        assert_eq!(
            result.status(),
            typed_fields::status::ValidationStatus::$status,
            "unexpected status for '{}'",
            result.name()
        );
    }};
}

/// Assert that a field result holds the given constraint statuses, in order.
#[macro_export]
macro_rules! assert_constraints {
    ($result:expr, [$(($name:expr, $status:ident)),* $(,)?]) => {{
        use typed_fields::result::Validated as _;
        let actual: Vec<(String, typed_fields::status::ValidationStatus)> = $result
            .constraints()
            .into_iter()
            .map(|c| (c.name().to_string(), c.status()))
            .collect();
        let expected: Vec<(String, typed_fields::status::ValidationStatus)> =
            vec![$(($name.to_string(), typed_fields::status::ValidationStatus::$status)),*];
        assert_eq!(actual, expected);
    }};
}

/// Route library logging to the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Unwrap a JSON object literal into a map.
pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Every status in a result, depth first, paired with its name.
pub fn status_tree(result: &typed_fields::FieldResult) -> Vec<(String, ValidationStatus)> {
    let mut out = vec![(result.name().to_string(), result.status())];
    match result {
        typed_fields::FieldResult::Field(field) => {
            out.extend(field.iter().map(|c| (c.name().to_string(), c.status())));
        }
        typed_fields::FieldResult::Composite(composite) => {
            for field in composite.iter() {
                out.push((field.name().to_string(), field.status()));
                out.extend(field.iter().map(|c| (c.name().to_string(), c.status())));
            }
        }
    }
    out
}
