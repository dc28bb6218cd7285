//! Ordered, deduplicated collections of results with a derived status.

use super::Validated;
use crate::status::ValidationStatus;
use serde::Serialize;

/// An ordered collection of child results with a roll-up status.
///
/// The status is computed once, when the aggregate is built, following
/// [`ValidationStatus::aggregate`]. Children are unique: adding a result
/// equal to one already present is a no-op. Operations that change the
/// collection return a new aggregate and leave `self` untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedValidationResult<T> {
    name: String,
    status: ValidationStatus,
    results: Vec<T>,
}

impl<T> AggregatedValidationResult<T>
where
    T: Validated + Clone + PartialEq,
{
    pub fn new(name: impl Into<String>, results: impl IntoIterator<Item = T>) -> Self {
        let mut unique: Vec<T> = Vec::new();
        for result in results {
            if !unique.contains(&result) {
                unique.push(result);
            }
        }
        let status = ValidationStatus::aggregate(unique.iter().map(Validated::status));
        Self {
            name: name.into(),
            status,
            results: unique,
        }
    }

    /// An aggregate with no children, whose status is `Pending`.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn results(&self) -> &[T] {
        &self.results
    }

    pub fn into_results(self) -> Vec<T> {
        self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// First child with the given name.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.results.iter().find(|r| r.name() == name)
    }

    pub fn add(&self, result: T) -> Self {
        let mut results = self.results.clone();
        results.push(result);
        Self::new(self.name.clone(), results)
    }

    pub fn remove(&self, result: &T) -> Self {
        self.filter(|r| r != result)
    }

    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool,
    {
        Self::new(
            self.name.clone(),
            self.results.iter().filter(|r| predicate(r)).cloned(),
        )
    }

    /// Concatenate `other`'s children after this aggregate's children.
    pub fn merge(&self, other: &Self) -> Self {
        Self::new(
            self.name.clone(),
            self.results.iter().chain(other.results.iter()).cloned(),
        )
    }

    pub fn with_status(&self, status: ValidationStatus) -> Self {
        self.filter(|r| r.status() == status)
    }

    pub fn get_failed(&self) -> Self {
        self.with_status(ValidationStatus::Failed)
    }

    pub fn get_passed(&self) -> Self {
        self.with_status(ValidationStatus::Passed)
    }

    pub fn get_skipped(&self) -> Self {
        self.with_status(ValidationStatus::Skipped)
    }

    pub fn get_pending(&self) -> Self {
        self.with_status(ValidationStatus::Pending)
    }
}

impl<T> Validated for AggregatedValidationResult<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> ValidationStatus {
        self.status
    }
}

impl<'a, T> IntoIterator for &'a AggregatedValidationResult<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
