//! Money fields: per-currency scale, limits and steps on the amount.

use crate::assert_status;
use crate::common::fixtures::{decimal, price};
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;
use typed_fields::field::{CompositeField, CurrencyRule, MoneyConfig};
use typed_fields::result::Validated;
use typed_fields::status::ValidationStatus;

fn amount_check(field: &mut CompositeField, amount: &str, currency: &str, check: &str) -> ValidationStatus {
    let result = field.input(json!({"amount": amount, "currency": currency}));
    let amount = result.get("price.amount").unwrap();
    amount.get(&format!("price.amount.{check}")).unwrap().status()
}

#[test]
fn test_scale_follows_currency_rule() {
    let mut cents = price(CurrencyRule::new(2));
    assert_eq!(amount_check(&mut cents, "1.234", "EUR", "scale"), ValidationStatus::Failed);
    assert_status!(cents.last_result().unwrap(), Failed);

    let mut mills = price(CurrencyRule::new(3));
    assert_eq!(amount_check(&mut mills, "1.234", "EUR", "scale"), ValidationStatus::Passed);
    assert_status!(mills.last_result().unwrap(), Passed);
}

#[test]
fn test_trailing_zeros_do_not_count_towards_scale() {
    let mut cents = price(CurrencyRule::new(2));
    assert_eq!(amount_check(&mut cents, "1.2300", "EUR", "scale"), ValidationStatus::Passed);
}

#[test]
fn test_multiple_currencies() {
    let config = MoneyConfig::new()
        .with_currency("EUR", CurrencyRule::new(2))
        .unwrap()
        .with_currency("JPY", CurrencyRule::new(0).with_min(decimal("1")))
        .unwrap();
    let mut field = CompositeField::money("price", config).unwrap();

    assert!(field.input(json!({"amount": "12.50", "currency": "EUR"})).passed());
    assert!(field.input(json!({"amount": "12.50", "currency": "JPY"})).failed());
    assert!(field.input(json!({"amount": "1250", "currency": "JPY"})).passed());
    assert!(field.input(json!({"amount": "0", "currency": "JPY"})).failed());
}

#[test]
fn test_each_sub_field_reported() {
    let mut field = price(CurrencyRule::new(2));
    let result = field.input(json!({"amount": "3", "currency": "EUR"})).clone();
    assert_eq!(result.len(), field_count(&field));
    let names: Vec<&str> = result.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["price.amount", "price.currency"]);
}

fn field_count(field: &CompositeField) -> usize {
    field.fields().len()
}

#[test]
fn test_missing_currency_fails_required_sub_field() {
    let mut field = price(CurrencyRule::new(2));
    let result = field.input(json!({"amount": "3"})).clone();
    assert!(result.failed());
    assert!(result.get("price.currency").unwrap().failed());
    assert_eq!(
        result.get("price.amount").unwrap().get("price.amount.scale").unwrap().status(),
        ValidationStatus::Skipped
    );
}

proptest! {
    #[test]
    fn amounts_within_scale_pass(units in 0i64..1_000_000, scale in 0u32..6) {
        let mut field = price(CurrencyRule::new(scale));
        let amount = Decimal::new(units, scale).to_string();
        let status = amount_check(&mut field, &amount, "EUR", "scale");
        prop_assert_eq!(status, ValidationStatus::Passed);
    }

    #[test]
    fn amounts_past_scale_fail(units in 1i64..1_000_000, scale in 0u32..6) {
        let mut field = price(CurrencyRule::new(scale));
        let amount = Decimal::new(units * 10 + 1, scale + 1).to_string();
        let status = amount_check(&mut field, &amount, "EUR", "scale");
        prop_assert_eq!(status, ValidationStatus::Failed);
    }
}
