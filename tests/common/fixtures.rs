//! Field fixtures shared across test modules.
//!
//! Each fixture comes with an input that exercises its constraints, so
//! round-trip tests can compare result trees before and after decoding.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use typed_fields::field::{
    AtomicField, AtomicKind, ChoiceConstraints, CompositeField, CurrencyRule, DateConstraints,
    DateTimeConstraints, DecimalConstraints, DurationConstraints, IntegerConstraints, MoneyConfig,
    PassphraseConstraints, PasswordConstraints, PasswordPolicy, TextConstraints, TimeConstraints,
    VariantField,
};
use typed_fields::precision::IsoDuration;
use typed_fields::Field;

pub fn duration(text: &str) -> IsoDuration {
    text.parse().expect("valid ISO 8601 duration")
}

pub fn decimal(text: &str) -> Decimal {
    text.parse().expect("valid decimal")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Weekly meetings starting on 2025-02-20.
pub fn weekly_meeting() -> AtomicField {
    let constraints = DateConstraints::new()
        .with_from(date(2025, 2, 20))
        .with_step(duration("P7D"));
    AtomicField::new("meeting", AtomicKind::Date(constraints)).expect("valid date field")
}

/// Money field with a single currency rule for EUR.
pub fn price(rule: CurrencyRule) -> CompositeField {
    let config = MoneyConfig::new()
        .with_currency("EUR", rule)
        .expect("valid currency rule");
    CompositeField::money("price", config).expect("valid money field")
}

/// Passphrase first, password second.
pub fn secret(policy: PasswordPolicy) -> VariantField {
    VariantField::new(
        "secret",
        vec![
            AtomicField::new("phrase", AtomicKind::Passphrase(PassphraseConstraints::default()))
                .expect("valid passphrase field"),
            AtomicField::new("word", AtomicKind::Password(PasswordConstraints::new(policy)))
                .expect("valid password field"),
        ],
    )
    .expect("valid variant")
}

/// A party of guests: two adults unless told otherwise, children optional.
pub fn party() -> CompositeField {
    CompositeField::new(
        "party",
        vec![
            AtomicField::new("adults", AtomicKind::Integer(IntegerConstraints::new().with_min(1)))
                .expect("valid adults")
                .with_default(json!(2)),
            AtomicField::new("children", AtomicKind::Integer(IntegerConstraints::new().with_min(0)))
                .expect("valid children")
                .with_optional(true),
        ],
    )
    .expect("valid composite")
}

/// One field of every built-in kind, each paired with a sample input.
pub fn every_kind() -> Vec<(Field, Value)> {
    let atomic = |name: &str, kind: AtomicKind| -> Field {
        AtomicField::new(name, kind).expect("valid fixture").into()
    };

    vec![
        (
            atomic(
                "username",
                AtomicKind::Text(
                    TextConstraints::new()
                        .with_min_length(3)
                        .with_max_length(16)
                        .with_pattern("^[a-z0-9_]+$"),
                ),
            ),
            json!("ada_l"),
        ),
        (atomic("email", AtomicKind::Email), json!("ada@example.org")),
        (
            atomic("plan", AtomicKind::Choice(ChoiceConstraints::new(["free", "pro"]))),
            json!("enterprise"),
        ),
        (atomic("active", AtomicKind::Boolean), json!(true)),
        (
            atomic(
                "seats",
                AtomicKind::Integer(IntegerConstraints::new().with_min(1).with_max(50).with_step(5)),
            ),
            json!(12),
        ),
        (
            atomic(
                "ratio",
                AtomicKind::Decimal(
                    DecimalConstraints::new()
                        .with_min(decimal("0"))
                        .with_max(decimal("1"))
                        .with_scale(2),
                ),
            ),
            json!("0.75"),
        ),
        (
            atomic("password", AtomicKind::Password(PasswordConstraints::new(PasswordPolicy::Strong))),
            json!("short"),
        ),
        (
            atomic("phrase", AtomicKind::Passphrase(PassphraseConstraints::default())),
            json!("correct horse battery staple"),
        ),
        (weekly_meeting().into(), json!("2025-03-06")),
        (
            atomic(
                "opening",
                AtomicKind::Time(
                    TimeConstraints::new()
                        .with_from(NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"))
                        .with_until(NaiveTime::from_hms_opt(17, 0, 0).expect("valid time"))
                        .with_step(duration("PT30M")),
                ),
            ),
            json!("09:45"),
        ),
        (
            atomic(
                "starts_at",
                AtomicKind::DateTime(
                    DateTimeConstraints::new()
                        .with_from("2025-01-01T00:00:00+00:00".parse().expect("valid datetime"))
                        .with_step(duration("PT1H")),
                ),
            ),
            json!("2025-01-02T05:00:00+02:00"),
        ),
        (
            atomic(
                "timeout",
                AtomicKind::Duration(
                    DurationConstraints::new()
                        .with_min(duration("PT1S"))
                        .with_max(duration("PT1H")),
                ),
            ),
            json!("PT90M"),
        ),
        (
            price(CurrencyRule::new(2).with_min(decimal("0.01"))).into(),
            json!({"amount": "19.999", "currency": "EUR"}),
        ),
        (
            CompositeField::new(
                "address",
                vec![
                    AtomicField::new("street", AtomicKind::Text(TextConstraints::new().with_min_length(1)))
                        .expect("valid street"),
                    AtomicField::new("zip", AtomicKind::Text(TextConstraints::new().with_pattern("^[0-9]{5}$")))
                        .expect("valid zip"),
                    AtomicField::new("country", AtomicKind::Choice(ChoiceConstraints::new(["DE", "FR"])))
                        .expect("valid country")
                        .with_optional(true),
                ],
            )
            .expect("valid composite")
            .into(),
            json!({"street": "Hauptstr. 1", "zip": "1011"}),
        ),
        (secret(PasswordPolicy::Basic).into(), json!("password")),
    ]
}
