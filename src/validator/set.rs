//! Validator classification and dependency ordering.

use super::Validator;
use crate::error::{ConfigurationError, ConfigurationResult};
use log::warn;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A field's validators, partitioned by role.
///
/// Construction fails fast when there is not exactly one type check, when two
/// validators share a name, when a dependency is not in the set, or when the
/// dependent validators form a cycle. Dependent validators are stored in
/// topological order, so every validator appears after the validators it
/// depends on.
#[derive(Debug, Clone)]
pub struct ValidatorSet {
    type_validator: Arc<dyn Validator>,
    independent: Vec<Arc<dyn Validator>>,
    dependent: Vec<Arc<dyn Validator>>,
}

impl ValidatorSet {
    pub fn new<I>(field: &str, validators: I) -> ConfigurationResult<Self>
    where
        I: IntoIterator<Item = Arc<dyn Validator>>,
    {
        let validators: Vec<Arc<dyn Validator>> = validators.into_iter().collect();

        let mut names = HashSet::new();
        for validator in &validators {
            if !names.insert(validator.name().as_str()) {
                return Err(ConfigurationError::DuplicateValidator {
                    name: validator.name().to_string(),
                });
            }
        }

        let mut type_checks = Vec::new();
        let mut independent = Vec::new();
        let mut dependent = Vec::new();
        for validator in &validators {
            if validator.checks_type() {
                type_checks.push(Arc::clone(validator));
            } else if validator.depends_on().is_some() {
                dependent.push(Arc::clone(validator));
            } else {
                independent.push(Arc::clone(validator));
            }
        }

        let type_validator = match type_checks.len() {
            0 => {
                return Err(ConfigurationError::CheckTypeValidatorIsRequired {
                    field: field.to_string(),
                });
            }
            1 => type_checks.remove(0),
            _ => {
                return Err(ConfigurationError::MultipleTypeValidators {
                    field: field.to_string(),
                    validators: type_checks.iter().map(|v| v.name().to_string()).collect(),
                });
            }
        };

        for validator in &dependent {
            for dependency in validator.depends_on().unwrap_or_default() {
                if !names.contains(dependency.as_str()) {
                    warn!(
                        "Field '{}': validator '{}' depends on unknown validator '{}'",
                        field,
                        validator.name(),
                        dependency
                    );
                    return Err(ConfigurationError::UnknownDependency {
                        validator: validator.name().to_string(),
                        dependency: dependency.to_string(),
                    });
                }
            }
        }

        let dependent = sort_dependents(dependent).inspect_err(|e| {
            warn!("Field '{}': {}", field, e);
        })?;

        Ok(Self {
            type_validator,
            independent,
            dependent,
        })
    }

    pub fn type_validator(&self) -> &dyn Validator {
        self.type_validator.as_ref()
    }

    pub fn independent(&self) -> &[Arc<dyn Validator>] {
        &self.independent
    }

    /// Dependent validators in topological order.
    pub fn dependent(&self) -> &[Arc<dyn Validator>] {
        &self.dependent
    }

    /// Every validator in execution order: type, independent, dependent.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Validator> {
        std::iter::once(self.type_validator.as_ref())
            .chain(self.independent.iter().map(|v| v.as_ref()))
            .chain(self.dependent.iter().map(|v| v.as_ref()))
    }

    /// Every validator except the type check, in execution order.
    pub fn constraints(&self) -> impl Iterator<Item = &dyn Validator> {
        self.iter().skip(1)
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|v| v.name().as_str()).collect()
    }

    pub fn len(&self) -> usize {
        1 + self.independent.len() + self.dependent.len()
    }

    /// Always `false`: a set cannot be built without its type check.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Order dependent validators so each comes after its dependencies.
///
/// Depth-first post-order: a validator is emitted once all of its
/// dependencies have been emitted. Revisiting a validator that is still on
/// the current path is a cycle, reported as the path from the first
/// occurrence of that validator back to itself.
fn sort_dependents(
    dependent: Vec<Arc<dyn Validator>>,
) -> ConfigurationResult<Vec<Arc<dyn Validator>>> {
    let index: HashMap<&str, usize> = dependent
        .iter()
        .enumerate()
        .map(|(i, v)| (v.name().as_str(), i))
        .collect();

    let mut sort = TopologicalSort {
        validators: &dependent,
        index,
        visiting: HashSet::new(),
        visited: HashSet::new(),
        path: Vec::new(),
        sorted: Vec::with_capacity(dependent.len()),
    };
    for node in 0..dependent.len() {
        sort.visit(node)?;
    }

    let order = sort.sorted;
    Ok(order.into_iter().map(|i| Arc::clone(&dependent[i])).collect())
}

struct TopologicalSort<'a> {
    validators: &'a [Arc<dyn Validator>],
    index: HashMap<&'a str, usize>,
    visiting: HashSet<usize>,
    visited: HashSet<usize>,
    path: Vec<usize>,
    sorted: Vec<usize>,
}

impl<'a> TopologicalSort<'a> {
    fn name(&self, node: usize) -> String {
        self.validators[node].name().to_string()
    }

    fn visit(&mut self, node: usize) -> ConfigurationResult<()> {
        if self.visited.contains(&node) {
            return Ok(());
        }
        if self.visiting.contains(&node) {
            let start = self.path.iter().position(|&n| n == node).unwrap_or(0);
            let mut path: Vec<String> = self.path[start..].iter().map(|&n| self.name(n)).collect();
            path.push(self.name(node));
            return Err(ConfigurationError::DependencyCycle { path });
        }

        self.visiting.insert(node);
        self.path.push(node);

        let validators = self.validators;
        for dependency in validators[node].depends_on().unwrap_or_default() {
            // dependencies on type or independent validators are already satisfied
            if let Some(&next) = self.index.get(dependency.as_str()) {
                self.visit(next)?;
            }
        }

        self.path.pop();
        self.visiting.remove(&node);
        self.visited.insert(node);
        self.sorted.push(node);
        Ok(())
    }
}
