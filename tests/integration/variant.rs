//! Variant fields resolve to the first candidate that passes.

use crate::common::fixtures::secret;
use crate::{assert_constraints, assert_status};
use serde_json::json;
use typed_fields::field::{
    AtomicField, AtomicKind, IntegerConstraints, PassphrasePolicy,
    PasswordConstraints, PasswordPolicy, VariantField,
};
use typed_fields::result::Validated;
use typed_fields::status::ValidationStatus;

#[test]
fn test_passphrase_wins_for_long_phrase() {
    let mut field = secret(PasswordPolicy::Basic);
    let result = field.input(json!("correct horse battery staple")).clone();
    assert_status!(result, Passed);
    assert_eq!(result.name(), "secret.passphrase");
    assert_eq!(field.matched_field().unwrap().name().as_str(), "secret.passphrase");
}

#[test]
fn test_password_wins_for_single_word() {
    let mut field = secret(PasswordPolicy::Basic);
    let result = field.input(json!("password")).clone();
    assert_status!(result, Passed);
    assert_eq!(result.name(), "secret.password");
    assert_constraints!(
        result,
        [("type", Passed), ("min_length", Passed), ("character_classes", Passed)]
    );
}

#[test]
fn test_no_candidate_matches() {
    let mut field = VariantField::new(
        "secret",
        vec![
            AtomicField::new("phrase", AtomicKind::Passphrase(PassphrasePolicy::Paranoid.constraints()))
                .unwrap(),
            AtomicField::new("word", AtomicKind::Password(PasswordConstraints::new(PasswordPolicy::Strong)))
                .unwrap(),
        ],
    )
    .unwrap();

    let result = field.input(json!("x")).clone();
    assert_status!(result, Failed);
    let attempts = result.as_composite().expect("attempts are aggregated");
    let names: Vec<&str> = attempts.iter().map(|a| a.name()).collect();
    assert_eq!(names, vec!["secret.passphrase", "secret.password"]);
    assert!(attempts.iter().all(|a| a.status() == ValidationStatus::Failed));
    assert!(field.matched_field().is_none());
}

#[test]
fn test_resolution_is_stateless_between_inputs() {
    let mut field = secret(PasswordPolicy::Basic);
    field.input(json!("password"));
    assert_eq!(field.matched_field().unwrap().tag(), "password");
    field.input(json!("x"));
    assert!(field.matched_field().is_none());
    assert!(field.validate().failed());
}

#[test]
fn test_unset_variant_reports_single_type_result() {
    let required = secret(PasswordPolicy::Basic);
    let result = required.validate();
    assert_constraints!(result, [("type", Failed)]);

    let optional = secret(PasswordPolicy::Basic).with_optional(true);
    assert_constraints!(optional.validate(), [("type", Skipped)]);
}

#[test]
fn test_default_value_is_resolved() {
    let mut field = secret(PasswordPolicy::Basic).with_default(json!("password"));
    assert_status!(field.validate(), Passed);
    assert_status!(field.input(json!(null)), Passed);
    assert_eq!(field.matched_field().unwrap().tag(), "password");
}

#[test]
fn test_declaration_order_breaks_ties() {
    let mut field = VariantField::new(
        "flag_or_count",
        vec![
            AtomicField::new("count", AtomicKind::Integer(IntegerConstraints::new().with_min(0))).unwrap(),
            AtomicField::new("flag", AtomicKind::Boolean).unwrap(),
        ],
    )
    .unwrap();
    assert_eq!(field.input(json!(3)).name(), "flag_or_count.integer");
    assert_eq!(field.input(json!(false)).name(), "flag_or_count.boolean");
    assert!(field.input(json!({"count": 3})).failed());
}
