//! ISO-8601 durations with exact nanosecond precision.
//!
//! Only fixed-length designators are accepted: weeks, days, hours, minutes
//! and seconds. Years and months have no fixed length in nanoseconds and are
//! rejected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const NANOS_PER_SECOND: i128 = 1_000_000_000;
pub const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND;
pub const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;
pub const NANOS_PER_DAY: i128 = 24 * NANOS_PER_HOUR;
pub const NANOS_PER_WEEK: i128 = 7 * NANOS_PER_DAY;

const DATE_UNITS: &[(char, i128)] = &[('W', NANOS_PER_WEEK), ('D', NANOS_PER_DAY)];
const TIME_UNITS: &[(char, i128)] = &[
    ('H', NANOS_PER_HOUR),
    ('M', NANOS_PER_MINUTE),
    ('S', NANOS_PER_SECOND),
];

/// Error returned when a string is not a supported ISO-8601 duration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid ISO-8601 duration '{input}': {reason}")]
pub struct DurationParseError {
    pub input: String,
    pub reason: &'static str,
}

/// A signed duration counted in nanoseconds.
///
/// ```rust
/// use typed_fields::precision::IsoDuration;
///
/// let week: IsoDuration = "P7D".parse().unwrap();
/// assert_eq!(week, "P1W".parse().unwrap());
/// assert_eq!("PT0.000000001S".parse::<IsoDuration>().unwrap().as_nanos(), 1);
/// assert!("P1M".parse::<IsoDuration>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IsoDuration {
    nanos: i128,
}

impl IsoDuration {
    pub const ZERO: IsoDuration = IsoDuration { nanos: 0 };

    pub fn from_nanos(nanos: i128) -> Self {
        Self { nanos }
    }

    pub fn from_seconds(seconds: i64) -> Self {
        Self::from_nanos(i128::from(seconds) * NANOS_PER_SECOND)
    }

    pub fn from_days(days: i64) -> Self {
        Self::from_nanos(i128::from(days) * NANOS_PER_DAY)
    }

    pub fn as_nanos(&self) -> i128 {
        self.nanos
    }

    pub fn is_zero(&self) -> bool {
        self.nanos == 0
    }

    pub fn is_negative(&self) -> bool {
        self.nanos < 0
    }

    pub fn parse(input: &str) -> Result<Self, DurationParseError> {
        let error = |reason| DurationParseError {
            input: input.to_string(),
            reason,
        };

        let (negative, unsigned) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input.strip_prefix('+').unwrap_or(input)),
        };
        let body = unsigned
            .strip_prefix('P')
            .ok_or_else(|| error("must start with 'P'"))?;

        let (date_part, time_part) = match body.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (body, None),
        };

        let (mut nanos, mut count) = parse_components(date_part, DATE_UNITS, false).map_err(error)?;
        if let Some(time_part) = time_part {
            if time_part.is_empty() {
                return Err(error("time designator 'T' without components"));
            }
            let (time_nanos, time_count) =
                parse_components(time_part, TIME_UNITS, true).map_err(error)?;
            nanos = nanos
                .checked_add(time_nanos)
                .ok_or_else(|| error("value out of range"))?;
            count += time_count;
        }
        if count == 0 {
            return Err(error("no duration components"));
        }

        Ok(Self::from_nanos(if negative { -nanos } else { nanos }))
    }
}

/// Parse `<number><designator>` pairs in the order given by `units`.
fn parse_components(
    part: &str,
    units: &[(char, i128)],
    time: bool,
) -> Result<(i128, usize), &'static str> {
    let mut total: i128 = 0;
    let mut count = 0;
    let mut next_unit = 0;
    let mut rest = part;

    while !rest.is_empty() {
        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or("missing designator")?;
        let (number, tail) = rest.split_at(end);
        let mut chars = tail.chars();
        let designator = chars.next().ok_or("missing designator")?;
        rest = chars.as_str();

        if designator == 'Y' || (designator == 'M' && !time) {
            return Err("years and months have no fixed length");
        }
        let offset = units[next_unit..]
            .iter()
            .position(|(unit, _)| *unit == designator)
            .ok_or("unexpected or out of order designator")?;
        let (unit, scale) = units[next_unit + offset];
        next_unit += offset + 1;

        let nanos = parse_number(number, scale, unit == 'S')?;
        total = total.checked_add(nanos).ok_or("value out of range")?;
        count += 1;
    }

    Ok((total, count))
}

fn parse_number(number: &str, scale: i128, fraction_allowed: bool) -> Result<i128, &'static str> {
    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (number, None),
    };
    if whole.is_empty() && fraction.is_none_or(str::is_empty) {
        return Err("missing number");
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err("malformed number");
    }

    let whole: i128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| "value out of range")?
    };
    let mut nanos = whole.checked_mul(scale).ok_or("value out of range")?;

    if let Some(fraction) = fraction {
        if !fraction_allowed {
            return Err("fractions are only allowed on seconds");
        }
        if fraction.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err("malformed fraction");
        }
        if fraction.len() > 9 {
            return Err("precision finer than nanoseconds");
        }
        let padded = format!("{fraction:0<9}");
        let fraction: i128 = padded.parse().map_err(|_| "malformed fraction")?;
        nanos = nanos.checked_add(fraction).ok_or("value out of range")?;
    }

    Ok(nanos)
}

impl FromStr for IsoDuration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nanos == 0 {
            return f.write_str("PT0S");
        }
        if self.nanos < 0 {
            f.write_str("-")?;
        }
        let mut rest = self.nanos.unsigned_abs();
        let days = rest / NANOS_PER_DAY as u128;
        rest %= NANOS_PER_DAY as u128;
        let hours = rest / NANOS_PER_HOUR as u128;
        rest %= NANOS_PER_HOUR as u128;
        let minutes = rest / NANOS_PER_MINUTE as u128;
        rest %= NANOS_PER_MINUTE as u128;
        let seconds = rest / NANOS_PER_SECOND as u128;
        let fraction = rest % NANOS_PER_SECOND as u128;

        f.write_str("P")?;
        if days > 0 {
            write!(f, "{days}D")?;
        }
        if hours == 0 && minutes == 0 && seconds == 0 && fraction == 0 {
            return Ok(());
        }
        f.write_str("T")?;
        if hours > 0 {
            write!(f, "{hours}H")?;
        }
        if minutes > 0 {
            write!(f, "{minutes}M")?;
        }
        if seconds > 0 || fraction > 0 {
            if fraction > 0 {
                let digits = format!("{fraction:09}");
                write!(f, "{seconds}.{}S", digits.trim_end_matches('0'))?;
            } else {
                write!(f, "{seconds}S")?;
            }
        }
        Ok(())
    }
}

impl Serialize for IsoDuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IsoDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}
