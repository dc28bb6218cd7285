//! Password and passphrase fields.

use super::{Validators, string_type};
use crate::error::{ConfigurationError, ConfigurationResult};
use crate::status::Outcome;
use crate::validator::Constraint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Strength levels for passwords.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PasswordPolicy {
    #[default]
    Basic,
    Moderate,
    Strong,
    Paranoid,
}

impl PasswordPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Moderate => "moderate",
            Self::Strong => "strong",
            Self::Paranoid => "paranoid",
        }
    }

    /// Minimum number of characters.
    pub fn min_length(&self) -> usize {
        match self {
            Self::Basic => 8,
            Self::Moderate => 10,
            Self::Strong => 12,
            Self::Paranoid => 16,
        }
    }

    /// Minimum number of character classes out of lowercase, uppercase,
    /// digits and symbols.
    pub fn min_classes(&self) -> usize {
        match self {
            Self::Basic => 1,
            Self::Moderate => 2,
            Self::Strong => 3,
            Self::Paranoid => 4,
        }
    }
}

impl fmt::Display for PasswordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PasswordPolicy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "moderate" => Ok(Self::Moderate),
            "strong" => Ok(Self::Strong),
            "paranoid" => Ok(Self::Paranoid),
            other => Err(ConfigurationError::invalid_constraint(
                "password",
                "policy",
                format!("unknown password policy '{other}'"),
            )),
        }
    }
}

impl Serialize for PasswordPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PasswordPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Constraints for passwords: a minimum length and, once that holds, a
/// minimum number of character classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordConstraints {
    pub policy: PasswordPolicy,
}

impl PasswordConstraints {
    pub fn new(policy: PasswordPolicy) -> Self {
        Self { policy }
    }

    pub(crate) fn validators(&self) -> Validators {
        let min_length = self.policy.min_length();
        let min_classes = self.policy.min_classes();
        vec![
            string_type(),
            Constraint::builtin("min_length", move |v| {
                with_str(v, |s| s.chars().count() >= min_length)
            })
            .into_validator(),
            Constraint::builtin_dependent("character_classes", &["min_length"], move |v| {
                with_str(v, |s| character_classes(s) >= min_classes)
            })
            .into_validator(),
        ]
    }
}

/// Named presets for passphrases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassphrasePolicy {
    #[default]
    Basic,
    Strong,
    Paranoid,
}

impl PassphrasePolicy {
    pub fn constraints(&self) -> PassphraseConstraints {
        let (min_words, min_entropy) = match self {
            Self::Basic => (4, 50.0),
            Self::Strong => (5, 70.0),
            Self::Paranoid => (6, 90.0),
        };
        PassphraseConstraints {
            min_words,
            min_entropy,
        }
    }
}

/// Constraints for passphrases: a minimum number of whitespace-separated
/// words and, once that holds, a minimum estimated entropy in bits.
///
/// Entropy is estimated as `length * log2(pool)`, where the pool is the sum
/// of the sizes of the character classes the phrase draws from.
///
/// When decoded, a `policy` preset supplies the defaults and explicit
/// `minWords`/`minEntropy` keys override it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PassphraseConfig")]
pub struct PassphraseConstraints {
    pub min_words: usize,
    pub min_entropy: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PassphraseConfig {
    #[serde(default)]
    policy: PassphrasePolicy,
    min_words: Option<usize>,
    min_entropy: Option<f64>,
}

impl From<PassphraseConfig> for PassphraseConstraints {
    fn from(config: PassphraseConfig) -> Self {
        let preset = config.policy.constraints();
        Self {
            min_words: config.min_words.unwrap_or(preset.min_words),
            min_entropy: config.min_entropy.unwrap_or(preset.min_entropy),
        }
    }
}

impl Default for PassphraseConstraints {
    fn default() -> Self {
        PassphrasePolicy::Basic.constraints()
    }
}

impl PassphraseConstraints {
    pub fn new(min_words: usize, min_entropy: f64) -> Self {
        Self {
            min_words,
            min_entropy,
        }
    }

    pub(crate) fn validators(&self, field: &str) -> ConfigurationResult<Validators> {
        if !self.min_entropy.is_finite() || self.min_entropy < 0.0 {
            return Err(ConfigurationError::invalid_constraint(
                field,
                "entropy",
                format!("minimum entropy must be a non-negative number, got {}", self.min_entropy),
            ));
        }

        let min_words = self.min_words;
        let min_entropy = self.min_entropy;
        Ok(vec![
            string_type(),
            Constraint::builtin("word_count", move |v| {
                with_str(v, |s| s.split_whitespace().count() >= min_words)
            })
            .into_validator(),
            Constraint::builtin_dependent("entropy", &["word_count"], move |v| {
                with_str(v, |s| entropy_bits(s) >= min_entropy)
            })
            .into_validator(),
        ])
    }
}

fn character_classes(value: &str) -> usize {
    let lower = value.chars().any(|c| c.is_lowercase());
    let upper = value.chars().any(|c| c.is_uppercase());
    let digit = value.chars().any(|c| c.is_ascii_digit());
    let symbol = value.chars().any(|c| !c.is_alphanumeric());
    [lower, upper, digit, symbol].into_iter().filter(|&b| b).count()
}

/// Estimated entropy in bits.
pub fn entropy_bits(value: &str) -> f64 {
    let mut pool = 0u32;
    if value.chars().any(|c| c.is_ascii_lowercase()) {
        pool += 26;
    }
    if value.chars().any(|c| c.is_ascii_uppercase()) {
        pool += 26;
    }
    if value.chars().any(|c| c.is_ascii_digit()) {
        pool += 10;
    }
    if value.chars().any(|c| c == ' ') {
        pool += 1;
    }
    if value.chars().any(|c| !c.is_ascii_alphanumeric() && c != ' ') {
        pool += 33;
    }
    if pool == 0 {
        return 0.0;
    }
    value.chars().count() as f64 * f64::from(pool).log2()
}

fn with_str(value: &Value, check: impl FnOnce(&str) -> bool) -> Outcome {
    match value.as_str() {
        Some(s) => Outcome::check(check(s)),
        None => Outcome::Skip,
    }
}
