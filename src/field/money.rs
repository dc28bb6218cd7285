//! Monetary amounts checked against per-currency rules.

use super::atomic::AtomicField;
use super::composite::{CompositeConstraint, CompositeField, CompositeKind};
use super::kinds::{AtomicKind, DecimalConstraints, TextConstraints, check_decimal_bounds};
use crate::error::{ConfigurationError, ConfigurationResult, SchemaResult};
use crate::precision::{decimal_scale, decimal_step_outcome, parse_decimal};
use crate::status::Outcome;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

const CURRENCY_PATTERN: &str = "^[A-Z]{3}$";

static CURRENCY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CURRENCY_PATTERN).expect("currency pattern is valid"));

/// Limits for amounts in one currency. `min` and `max` are inclusive and
/// `step` is counted from `min`, or from zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRule {
    pub scale: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<Decimal>,
}

impl CurrencyRule {
    pub fn new(scale: u32) -> Self {
        Self {
            scale,
            min: None,
            max: None,
            step: None,
        }
    }

    pub fn with_min(mut self, min: Decimal) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: Decimal) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_step(mut self, step: Decimal) -> Self {
        self.step = Some(step);
        self
    }
}

/// Currency rules keyed by ISO 4217 code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoneyConfig {
    pub currencies: BTreeMap<String, CurrencyRule>,
}

impl MoneyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currency(mut self, code: &str, rule: CurrencyRule) -> ConfigurationResult<Self> {
        check_rule("money", code, &rule)?;
        self.currencies.insert(code.to_string(), rule);
        Ok(self)
    }

    pub fn rule(&self, code: &str) -> Option<&CurrencyRule> {
        self.currencies.get(code)
    }

    pub(crate) fn check(&self, field: &str) -> ConfigurationResult<()> {
        self.currencies
            .iter()
            .try_for_each(|(code, rule)| check_rule(field, code, rule))
    }

    pub(crate) fn to_map(&self) -> SchemaResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

fn check_rule(field: &str, code: &str, rule: &CurrencyRule) -> ConfigurationResult<()> {
    if !CURRENCY_CODE.is_match(code) {
        return Err(ConfigurationError::invalid_constraint(
            field,
            "currency",
            format!("'{code}' is not a three-letter currency code"),
        ));
    }
    check_decimal_bounds(field, rule.min, rule.max, rule.step, Some(rule.scale))
}

type RuleCheck = fn(&CurrencyRule, Decimal) -> Outcome;

const AMOUNT_CHECKS: [(&str, RuleCheck); 4] = [
    ("scale", check_scale),
    ("min", check_min),
    ("max", check_max),
    ("step", check_step),
];

fn check_scale(rule: &CurrencyRule, amount: Decimal) -> Outcome {
    Outcome::check(decimal_scale(amount) <= rule.scale)
}

fn check_min(rule: &CurrencyRule, amount: Decimal) -> Outcome {
    rule.min.map_or(Outcome::Skip, |min| Outcome::check(amount >= min))
}

fn check_max(rule: &CurrencyRule, amount: Decimal) -> Outcome {
    rule.max.map_or(Outcome::Skip, |max| Outcome::check(amount <= max))
}

fn check_step(rule: &CurrencyRule, amount: Decimal) -> Outcome {
    rule.step.map_or(Outcome::Skip, |step| {
        decimal_step_outcome(amount, rule.min.unwrap_or(Decimal::ZERO), step)
    })
}

impl CompositeField {
    /// A money field with `amount` (decimal) and `currency` (three capital
    /// letters) sub-fields.
    ///
    /// The amount is checked against the rule for the given currency under
    /// `<name>.amount.scale`, `.min`, `.max` and `.step`. Each check is
    /// skipped when the currency has no rule, or the rule leaves that limit
    /// unset.
    ///
    /// ```rust
    /// use typed_fields::field::{CompositeField, CurrencyRule, MoneyConfig};
    /// use typed_fields::result::Validated;
    /// use serde_json::json;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = MoneyConfig::new().with_currency("EUR", CurrencyRule::new(2))?;
    /// let mut price = CompositeField::money("price", config)?;
    /// assert!(price.input(json!({"amount": "9.99", "currency": "EUR"})).passed());
    /// assert!(price.input(json!({"amount": "9.999", "currency": "EUR"})).failed());
    /// # Ok(())
    /// # }
    /// ```
    pub fn money(name: &str, config: MoneyConfig) -> ConfigurationResult<Self> {
        config.check(name)?;
        let amount = AtomicField::new("amount", AtomicKind::Decimal(DecimalConstraints::new()))?;
        let currency = AtomicField::new(
            "currency",
            AtomicKind::Text(TextConstraints::new().with_pattern(CURRENCY_PATTERN)),
        )?;

        let rules = Arc::new(config.currencies.clone());
        let constraints = AMOUNT_CHECKS
            .iter()
            .map(|&(check_name, check)| {
                let rules = Arc::clone(&rules);
                CompositeConstraint::builtin("amount", check_name, move |money| {
                    let rule = money
                        .get("currency")
                        .and_then(Value::as_str)
                        .and_then(|code| rules.get(code));
                    match (rule, money.get("amount").and_then(parse_decimal)) {
                        (Some(rule), Some(amount)) => check(rule, amount),
                        _ => Outcome::Skip,
                    }
                })
            })
            .collect();

        CompositeField::with_kind(
            name,
            CompositeKind::Money(config),
            vec![amount, currency],
            constraints,
        )
    }
}
