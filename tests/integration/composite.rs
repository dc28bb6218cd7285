//! Composite fields: one result per sub-field, composite constraints first.

use crate::assert_status;
use crate::common::init_logging;
use proptest::prelude::*;
use serde_json::{Map, Value, json};
use typed_fields::field::{
    AtomicField, AtomicKind, CompositeConstraint, CompositeField, DateConstraints, TextConstraints,
};
use typed_fields::precision::parse_date;
use typed_fields::result::Validated;
use typed_fields::status::{Outcome, ValidationStatus};

fn stay() -> CompositeField {
    let day = || AtomicKind::Date(DateConstraints::new());
    CompositeField::new(
        "stay",
        vec![
            AtomicField::new("check_in", day()).unwrap(),
            AtomicField::new("check_out", day()).unwrap(),
            AtomicField::new("note", AtomicKind::Text(TextConstraints::new().with_max_length(20)))
                .unwrap()
                .with_optional(true),
        ],
    )
    .unwrap()
    .with_constraint(
        CompositeConstraint::new("check_out", "after_check_in", |stay| {
            match (parse_date(&stay["check_in"]), parse_date(&stay["check_out"])) {
                (Some(check_in), Some(check_out)) => Outcome::check(check_out > check_in),
                _ => Outcome::Skip,
            }
        })
        .unwrap(),
    )
    .unwrap()
}

#[test]
fn test_composite_constraint_reported_on_sub_field() {
    init_logging();
    let mut field = stay();
    let result = field
        .input(json!({"check_in": "2025-06-01", "check_out": "2025-05-30"}))
        .clone();
    assert_status!(result, Failed);

    let check_out = result.get("stay.check_out").unwrap();
    assert_eq!(
        check_out.get("stay.check_out.after_check_in").unwrap().status(),
        ValidationStatus::Failed
    );
    assert!(result.get("stay.check_in").unwrap().passed());
    assert!(result.get("stay.note").unwrap().skipped());
}

#[test]
fn test_valid_record_passes() {
    let mut field = stay();
    let result = field.input(json!({
        "check_in": "2025-06-01",
        "check_out": "2025-06-04",
        "note": "late arrival"
    }));
    assert_status!(result, Passed);
    assert_eq!(
        field.resolved_value().raw(),
        Some(&json!({"check_in": "2025-06-01", "check_out": "2025-06-04", "note": "late arrival"}))
    );
}

#[test]
fn test_sub_field_lookup() {
    let field = stay();
    assert_eq!(field.get_field("note").unwrap().name().as_str(), "stay.note");
    assert!(field.get_field("stay.check_in").is_some());
    assert!(field.get_field("check_in_time").is_none());
}

#[test]
fn test_own_constraint_stops_at_first_failure() {
    let mut field = stay();
    let result = field
        .input(json!({
            "check_in": "2025-06-01",
            "check_out": "2025-06-04",
            "note": "this note is far too long to fit"
        }))
        .clone();
    let note = result.get("stay.note").unwrap();
    assert!(note.get("type").unwrap().passed());
    assert!(note.get("max_length").unwrap().failed());
}

fn sub_field_value() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        Just(Some(Value::Null)),
        "[a-z]{0,8}".prop_map(|s| Some(json!(s))),
        any::<i32>().prop_map(|n| Some(json!(n))),
        any::<bool>().prop_map(|b| Some(json!(b))),
    ]
}

proptest! {
    #[test]
    fn every_sub_field_gets_one_result(
        shape in prop::collection::vec((any::<bool>(), sub_field_value()), 1..6),
        optional in any::<bool>(),
    ) {
        let fields = shape
            .iter()
            .enumerate()
            .map(|(i, (optional, _))| {
                AtomicField::new(&format!("f{i}"), AtomicKind::Text(TextConstraints::new().with_min_length(2)))
                    .unwrap()
                    .with_optional(*optional)
            })
            .collect();
        let mut field = CompositeField::new("record", fields).unwrap().with_optional(optional);

        let input: Map<String, Value> = shape
            .iter()
            .enumerate()
            .filter_map(|(i, (_, value))| value.clone().map(|v| (format!("f{i}"), v)))
            .collect();
        let result = field.input(Value::Object(input)).clone();

        prop_assert_eq!(result.len(), shape.len());
        for (i, sub) in result.iter().enumerate() {
            let expected = format!("record.f{i}");
            prop_assert_eq!(sub.name(), expected.as_str());
            prop_assert_eq!(sub.len(), 2);
        }
    }
}
