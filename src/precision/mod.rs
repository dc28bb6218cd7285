//! Exact arithmetic for temporal and monetary constraints.
//!
//! Temporal values are mapped to signed nanosecond counts held in `i128`, and
//! amounts to [`rust_decimal::Decimal`], so step checks never go through
//! binary floating point.

mod duration;

pub use duration::{
    DurationParseError, IsoDuration, NANOS_PER_DAY, NANOS_PER_HOUR, NANOS_PER_MINUTE,
    NANOS_PER_SECOND, NANOS_PER_WEEK,
};

use crate::status::Outcome;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i128 = 719_163;

/// Whether `value` lies a whole number of steps away from `anchor`.
///
/// A zero step never matches, and neither does a distance too large to
/// represent.
pub fn step_outcome(value: i128, anchor: i128, step: i128) -> Outcome {
    if step == 0 {
        return Outcome::Fail;
    }
    match value.checked_sub(anchor).and_then(|distance| distance.checked_rem(step)) {
        Some(remainder) => Outcome::check(remainder == 0),
        None => Outcome::Fail,
    }
}

/// Decimal flavour of [`step_outcome`].
pub fn decimal_step_outcome(value: Decimal, anchor: Decimal, step: Decimal) -> Outcome {
    if step.is_zero() {
        return Outcome::Fail;
    }
    match value.checked_sub(anchor).and_then(|distance| distance.checked_rem(step)) {
        Some(remainder) => Outcome::check(remainder.is_zero()),
        None => Outcome::Fail,
    }
}

/// Nanoseconds from the Unix epoch to midnight of `date`.
pub fn date_nanos(date: NaiveDate) -> i128 {
    (i128::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE) * NANOS_PER_DAY
}

/// Nanoseconds since midnight.
pub fn time_nanos(time: NaiveTime) -> i128 {
    i128::from(time.num_seconds_from_midnight()) * NANOS_PER_SECOND + i128::from(time.nanosecond())
}

/// Nanoseconds since the Unix epoch.
pub fn datetime_nanos(datetime: &DateTime<FixedOffset>) -> i128 {
    i128::from(datetime.timestamp()) * NANOS_PER_SECOND
        + i128::from(datetime.timestamp_subsec_nanos())
}

pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.as_str()?, "%Y-%m-%d").ok()
}

pub fn parse_time(value: &Value) -> Option<NaiveTime> {
    let text = value.as_str()?;
    NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()
}

pub fn parse_datetime(value: &Value) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.as_str()?).ok()
}

pub fn parse_duration(value: &Value) -> Option<IsoDuration> {
    IsoDuration::parse(value.as_str()?).ok()
}

/// Read a decimal from a numeric string or a JSON number without going
/// through `f64`.
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(text) => decimal_from_str(text.trim()),
        Value::Number(number) => decimal_from_str(&number.to_string()),
        _ => None,
    }
}

fn decimal_from_str(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Number of significant fractional digits, ignoring trailing zeros.
pub fn decimal_scale(value: Decimal) -> u32 {
    value.normalize().scale()
}
