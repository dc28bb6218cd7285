//! Validation status and the three-valued predicate outcome.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a single constraint or of an aggregate of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Passed,
    Pending,
    Skipped,
    Failed,
}

impl ValidationStatus {
    /// Roll up a sequence of child statuses.
    ///
    /// - `Pending` if there are no children or any child is pending
    /// - otherwise `Failed` if any child failed
    /// - otherwise `Skipped` if every child was skipped
    /// - otherwise `Passed`
    pub fn aggregate<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = ValidationStatus>,
    {
        let mut seen_any = false;
        let mut any_failed = false;
        let mut all_skipped = true;

        for status in statuses {
            seen_any = true;
            match status {
                Self::Pending => return Self::Pending,
                Self::Failed => any_failed = true,
                Self::Passed => all_skipped = false,
                Self::Skipped => {}
            }
        }

        if !seen_any {
            Self::Pending
        } else if any_failed {
            Self::Failed
        } else if all_skipped {
            Self::Skipped
        } else {
            Self::Passed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Pending => "pending",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating one constraint predicate.
///
/// `Skip` means the predicate could not decide, for example because the
/// value it depends on is not configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Pass,
    Fail,
    Skip,
}

impl Outcome {
    /// `Pass` when the condition holds, `Fail` otherwise.
    pub fn check(condition: bool) -> Self {
        if condition { Self::Pass } else { Self::Fail }
    }
}

impl From<bool> for Outcome {
    fn from(value: bool) -> Self {
        Self::check(value)
    }
}

impl From<Outcome> for ValidationStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Pass => Self::Passed,
            Outcome::Fail => Self::Failed,
            Outcome::Skip => Self::Skipped,
        }
    }
}
