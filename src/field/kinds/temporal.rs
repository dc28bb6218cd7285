//! Date, time, datetime and duration fields.
//!
//! Every temporal value is reduced to a signed nanosecond count before it is
//! compared, so bounds and steps are checked with integer arithmetic only.

use super::Validators;
use crate::error::{ConfigurationError, ConfigurationResult};
use crate::precision::{
    IsoDuration, date_nanos, datetime_nanos, parse_date, parse_datetime, parse_duration,
    parse_time, step_outcome, time_nanos,
};
use crate::status::Outcome;
use crate::validator::Constraint;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How one temporal kind maps values to nanoseconds and names its bounds.
struct TemporalRule {
    lower: &'static str,
    upper: &'static str,
    upper_inclusive: bool,
    nanos: fn(&Value) -> Option<i128>,
}

const DATE: TemporalRule = TemporalRule {
    lower: "from",
    upper: "until",
    upper_inclusive: false,
    nanos: date_value,
};

const TIME: TemporalRule = TemporalRule {
    lower: "from",
    upper: "until",
    upper_inclusive: true,
    nanos: time_value,
};

const DATETIME: TemporalRule = TemporalRule {
    lower: "from",
    upper: "until",
    upper_inclusive: false,
    nanos: datetime_value,
};

const DURATION: TemporalRule = TemporalRule {
    lower: "min",
    upper: "max",
    upper_inclusive: false,
    nanos: duration_value,
};

fn date_value(value: &Value) -> Option<i128> {
    parse_date(value).map(date_nanos)
}

fn time_value(value: &Value) -> Option<i128> {
    parse_time(value).map(time_nanos)
}

fn datetime_value(value: &Value) -> Option<i128> {
    parse_datetime(value).map(|dt| datetime_nanos(&dt))
}

fn duration_value(value: &Value) -> Option<i128> {
    parse_duration(value).map(|d| d.as_nanos())
}

impl TemporalRule {
    /// Builds the validator list. Without a lower bound, steps are counted
    /// from nanosecond zero: the Unix epoch, midnight or the empty duration.
    fn validators(
        &self,
        field: &str,
        lower: Option<i128>,
        upper: Option<i128>,
        step: Option<IsoDuration>,
    ) -> ConfigurationResult<Validators> {
        if let (Some(lower), Some(upper)) = (lower, upper) {
            let inverted = if self.upper_inclusive {
                lower > upper
            } else {
                lower >= upper
            };
            if inverted {
                return Err(ConfigurationError::invalid_constraint(
                    field,
                    self.lower,
                    format!("'{}' must come before '{}'", self.lower, self.upper),
                ));
            }
        }
        if step.is_some_and(|step| step.is_negative()) {
            return Err(ConfigurationError::invalid_constraint(
                field,
                "step",
                "step must not be negative",
            ));
        }

        let nanos = self.nanos;
        let mut validators =
            vec![Constraint::type_check(move |v| Outcome::check(nanos(v).is_some())).into_validator()];

        if let Some(lower) = lower {
            validators.push(
                Constraint::builtin(self.lower, move |v| with_nanos(nanos, v, |n| n >= lower))
                    .into_validator(),
            );
        }
        if let Some(upper) = upper {
            let inclusive = self.upper_inclusive;
            validators.push(
                Constraint::builtin(self.upper, move |v| {
                    with_nanos(nanos, v, |n| if inclusive { n <= upper } else { n < upper })
                })
                .into_validator(),
            );
        }
        if let Some(step) = step {
            let anchor = lower.unwrap_or(0);
            let step = step.as_nanos();
            let check = move |v: &Value| match nanos(v) {
                Some(n) => step_outcome(n, anchor, step),
                None => Outcome::Skip,
            };
            let constraint = match lower {
                Some(_) => Constraint::builtin_dependent("step", &[self.lower], check),
                None => Constraint::builtin("step", check),
            };
            validators.push(constraint.into_validator());
        }
        Ok(validators)
    }
}

fn with_nanos(
    nanos: fn(&Value) -> Option<i128>,
    value: &Value,
    check: impl FnOnce(i128) -> bool,
) -> Outcome {
    match nanos(value) {
        Some(n) => Outcome::check(check(n)),
        None => Outcome::Skip,
    }
}

/// Calendar dates (`YYYY-MM-DD`). `until` is exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<IsoDuration>,
}

impl DateConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_from(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_until(mut self, until: NaiveDate) -> Self {
        self.until = Some(until);
        self
    }

    pub fn with_step(mut self, step: IsoDuration) -> Self {
        self.step = Some(step);
        self
    }

    pub(crate) fn validators(&self, field: &str) -> ConfigurationResult<Validators> {
        DATE.validators(
            field,
            self.from.map(date_nanos),
            self.until.map(date_nanos),
            self.step,
        )
    }
}

/// Times of day (`HH:MM[:SS[.fraction]]`). Unlike the other temporal kinds,
/// `until` is inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<IsoDuration>,
}

impl TimeConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_from(mut self, from: NaiveTime) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_until(mut self, until: NaiveTime) -> Self {
        self.until = Some(until);
        self
    }

    pub fn with_step(mut self, step: IsoDuration) -> Self {
        self.step = Some(step);
        self
    }

    pub(crate) fn validators(&self, field: &str) -> ConfigurationResult<Validators> {
        TIME.validators(
            field,
            self.from.map(time_nanos),
            self.until.map(time_nanos),
            self.step,
        )
    }
}

/// RFC 3339 timestamps with an offset. `until` is exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateTimeConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<IsoDuration>,
}

impl DateTimeConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_from(mut self, from: DateTime<FixedOffset>) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_until(mut self, until: DateTime<FixedOffset>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn with_step(mut self, step: IsoDuration) -> Self {
        self.step = Some(step);
        self
    }

    pub(crate) fn validators(&self, field: &str) -> ConfigurationResult<Validators> {
        DATETIME.validators(
            field,
            self.from.as_ref().map(datetime_nanos),
            self.until.as_ref().map(datetime_nanos),
            self.step,
        )
    }
}

/// ISO 8601 durations. `max` is exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DurationConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<IsoDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<IsoDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<IsoDuration>,
}

impl DurationConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min(mut self, min: IsoDuration) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: IsoDuration) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_step(mut self, step: IsoDuration) -> Self {
        self.step = Some(step);
        self
    }

    pub(crate) fn validators(&self, field: &str) -> ConfigurationResult<Validators> {
        DURATION.validators(
            field,
            self.min.map(|d| d.as_nanos()),
            self.max.map(|d| d.as_nanos()),
            self.step,
        )
    }
}
