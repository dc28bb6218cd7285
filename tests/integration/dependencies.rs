//! Validator classification, ordering and dependency propagation.

use crate::assert_status;
use crate::common::init_logging;
use proptest::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use typed_fields::error::ConfigurationError;
use typed_fields::field::{AtomicField, AtomicKind, TextConstraints};
use typed_fields::result::Validated;
use typed_fields::status::{Outcome, ValidationStatus};
use typed_fields::validator::{Constraint, FieldValidator, Validator, ValidatorSet};

fn type_check() -> Arc<dyn Validator> {
    Constraint::type_check(|_| Outcome::Pass).into_validator()
}

fn node(name: &str, deps: &[&str]) -> Arc<dyn Validator> {
    let constraint = Constraint::new(name, |_| Outcome::Pass).unwrap();
    if deps.is_empty() {
        constraint.into_validator()
    } else {
        constraint.depending_on(deps).unwrap().into_validator()
    }
}

/// Adjacency rows for up to eight nodes plus a shuffled insertion order.
/// Node `i` may only depend on nodes `j < i`, so the graph is acyclic.
fn dag() -> impl Strategy<Value = (Vec<Vec<bool>>, Vec<usize>)> {
    prop::collection::vec(prop::collection::vec(any::<bool>(), 8), 1..8).prop_flat_map(|rows| {
        let order = Just((0..rows.len()).collect::<Vec<_>>()).prop_shuffle();
        (Just(rows), order)
    })
}

fn dependencies_of(rows: &[Vec<bool>], i: usize) -> Vec<String> {
    (0..i).filter(|&j| rows[i][j]).map(|j| format!("v{j}")).collect()
}

proptest! {
    #[test]
    fn dependents_run_after_their_dependencies((rows, order) in dag()) {
        let validators = std::iter::once(type_check()).chain(order.iter().map(|&i| {
            let deps = dependencies_of(&rows, i);
            let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
            node(&format!("v{i}"), &deps)
        }));
        let set = ValidatorSet::new("graph", validators).unwrap();
        let names = set.names();

        prop_assert_eq!(names.len(), rows.len() + 1);
        prop_assert_eq!(names[0], "type");
        for validator in set.dependent() {
            let at = names.iter().position(|n| *n == validator.name().as_str()).unwrap();
            for dependency in validator.depends_on().unwrap_or_default() {
                let before = names.iter().position(|n| *n == dependency.as_str()).unwrap();
                prop_assert!(before < at, "{} ran before its dependency {}", validator.name(), dependency);
            }
        }
    }

    #[test]
    fn rings_are_reported_as_closed_paths(len in 2usize..7, rotate in 0usize..7) {
        let mut ring: Vec<Arc<dyn Validator>> = (0..len)
            .map(|i| {
                let next = format!("v{}", (i + 1) % len);
                node(&format!("v{i}"), &[next.as_str()])
            })
            .collect();
        ring.rotate_left(rotate % len);

        let error = ValidatorSet::new("ring", std::iter::once(type_check()).chain(ring)).unwrap_err();
        let path = match error {
            ConfigurationError::DependencyCycle { path } => path,
            other => return Err(TestCaseError::fail(format!("expected a cycle, got {other}"))),
        };
        prop_assert_eq!(path.len(), len + 1);
        prop_assert_eq!(path.first(), path.last());
        for i in 0..len {
            let expected = format!("v{i}");
            prop_assert!(path.contains(&expected));
        }
    }
}

#[test]
fn test_two_node_cycle_path() {
    let result = ValidatorSet::new("f", vec![type_check(), node("a", &["b"]), node("b", &["a"])]);
    match result {
        Err(ConfigurationError::DependencyCycle { path }) => assert_eq!(path, vec!["a", "b", "a"]),
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[test]
fn test_type_check_is_required_and_unique() {
    assert!(matches!(
        ValidatorSet::new("f", vec![node("a", &[])]),
        Err(ConfigurationError::CheckTypeValidatorIsRequired { .. })
    ));
    assert!(matches!(
        ValidatorSet::new("f", vec![type_check(), type_check()]),
        Err(ConfigurationError::DuplicateValidator { .. } | ConfigurationError::MultipleTypeValidators { .. })
    ));
}

#[test]
fn test_unknown_dependency_rejected() {
    let result = ValidatorSet::new("f", vec![type_check(), node("a", &["missing"])]);
    assert!(matches!(
        result,
        Err(ConfigurationError::UnknownDependency { ref dependency, .. }) if dependency == "missing"
    ));
}

#[test]
fn test_failure_skips_dependents_transitively() {
    init_logging();
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = |name: &str, deps: &[&str]| {
        let calls = Arc::clone(&calls);
        Constraint::new(name, move |_: &Value| {
            calls.fetch_add(1, Ordering::SeqCst);
            Outcome::Pass
        })
        .unwrap()
        .depending_on(deps)
        .unwrap()
        .into_validator()
    };

    let set = ValidatorSet::new(
        "f",
        vec![
            type_check(),
            Constraint::new("a", |_| Outcome::Fail).unwrap().into_validator(),
            counted("b", &["a"]),
            counted("c", &["b"]),
            node("d", &[]),
        ],
    )
    .unwrap();

    let result = FieldValidator::new("f", &set, false).validate(Some(&json!(1)));
    assert_status!(result, Failed);
    assert_eq!(result.get("a").unwrap().status(), ValidationStatus::Failed);
    assert_eq!(result.get("b").unwrap().status(), ValidationStatus::Skipped);
    assert_eq!(result.get("c").unwrap().status(), ValidationStatus::Skipped);
    assert_eq!(result.get("d").unwrap().status(), ValidationStatus::Passed);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_skip_outcome_does_not_satisfy_dependents() {
    let set = ValidatorSet::new(
        "f",
        vec![
            type_check(),
            Constraint::new("maybe", |_| Outcome::Skip).unwrap().into_validator(),
            node("after", &["maybe"]),
        ],
    )
    .unwrap();
    let result = FieldValidator::new("f", &set, false).validate(Some(&json!("x")));
    assert_eq!(result.get("maybe").unwrap().status(), ValidationStatus::Skipped);
    assert_eq!(result.get("after").unwrap().status(), ValidationStatus::Skipped);
    assert_status!(result, Passed);
}

#[test]
fn test_custom_constraint_depends_on_builtin() {
    let no_digits = Constraint::new("no_digits", |v| match v.as_str() {
        Some(s) => Outcome::check(!s.chars().any(|c| c.is_ascii_digit())),
        None => Outcome::Fail,
    })
    .unwrap()
    .depending_on(&["min_length"])
    .unwrap();

    let mut field = AtomicField::new("nick", AtomicKind::Text(TextConstraints::new().with_min_length(3)))
        .unwrap()
        .with_constraint(no_digits.into_validator())
        .unwrap();
    assert_eq!(field.validators().names(), vec!["type", "min_length", "no_digits"]);

    let short = field.input(json!("a1")).clone();
    assert_eq!(short.get("min_length").unwrap().status(), ValidationStatus::Failed);
    assert_eq!(short.get("no_digits").unwrap().status(), ValidationStatus::Skipped);

    assert!(field.input(json!("abc1")).failed());
    assert!(field.input(json!("abcd")).passed());
}

#[test]
fn test_rejected_constraint_leaves_field_unchanged() {
    let mut field = AtomicField::new("nick", AtomicKind::Text(TextConstraints::new())).unwrap();
    let second_type = Constraint::type_check(|_| Outcome::Pass).into_validator();
    assert!(field.add_constraint(second_type).is_err());

    let dangling = Constraint::new("x", |_| Outcome::Pass)
        .unwrap()
        .depending_on(&["nothing"])
        .unwrap();
    assert!(field.add_constraint(dangling.into_validator()).is_err());
    assert_eq!(field.validators().names(), vec!["type"]);
}
