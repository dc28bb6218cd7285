//! Property tests for status roll-up.

use proptest::prelude::*;
use typed_fields::result::{AggregatedValidationResult, ConstraintValidationResult, Validated};
use typed_fields::status::ValidationStatus;

fn status() -> impl Strategy<Value = ValidationStatus> {
    prop_oneof![
        Just(ValidationStatus::Passed),
        Just(ValidationStatus::Failed),
        Just(ValidationStatus::Skipped),
        Just(ValidationStatus::Pending),
    ]
}

/// The roll-up rule written out as plain set membership.
fn expected(statuses: &[ValidationStatus]) -> ValidationStatus {
    if statuses.is_empty() || statuses.contains(&ValidationStatus::Pending) {
        ValidationStatus::Pending
    } else if statuses.contains(&ValidationStatus::Failed) {
        ValidationStatus::Failed
    } else if statuses.iter().all(|s| *s == ValidationStatus::Skipped) {
        ValidationStatus::Skipped
    } else {
        ValidationStatus::Passed
    }
}

proptest! {
    #[test]
    fn aggregate_follows_roll_up_rule(statuses in prop::collection::vec(status(), 0..12)) {
        prop_assert_eq!(ValidationStatus::aggregate(statuses.iter().copied()), expected(&statuses));
    }

    #[test]
    fn aggregate_ignores_order(statuses in prop::collection::vec(status(), 0..12)) {
        let mut reversed = statuses.clone();
        reversed.reverse();
        prop_assert_eq!(
            ValidationStatus::aggregate(statuses),
            ValidationStatus::aggregate(reversed)
        );
    }

    #[test]
    fn aggregated_result_status_matches_children(statuses in prop::collection::vec(status(), 0..12)) {
        let children: Vec<ConstraintValidationResult> = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| ConstraintValidationResult::new(format!("c{i}"), *s))
            .collect();
        let aggregate = AggregatedValidationResult::new("field", children);
        prop_assert_eq!(aggregate.len(), statuses.len());
        prop_assert_eq!(aggregate.status(), expected(&statuses));
    }

    #[test]
    fn equal_children_collapse(status in status(), copies in 1usize..6) {
        let children = vec![ConstraintValidationResult::new("same", status); copies];
        let aggregate = AggregatedValidationResult::new("field", children);
        prop_assert_eq!(aggregate.len(), 1);
        prop_assert_eq!(aggregate.status(), status);
    }
}

#[test]
fn test_empty_aggregate_is_pending() {
    let empty = AggregatedValidationResult::<ConstraintValidationResult>::empty("nothing");
    assert!(empty.pending());
}

#[test]
fn test_skipped_and_passed_mix_passes() {
    let aggregate = AggregatedValidationResult::new(
        "field",
        vec![
            ConstraintValidationResult::passed("type"),
            ConstraintValidationResult::skipped("max"),
        ],
    );
    assert!(aggregate.passed());
}
