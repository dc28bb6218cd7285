//! Ordered collections of uniquely named fields.

use crate::error::{ConfigurationError, ConfigurationResult};
use crate::name::FieldName;
use std::collections::HashSet;

/// A field that can be looked up and renamed inside a [`FieldSet`].
pub trait Named {
    fn name(&self) -> &FieldName;

    /// Rename the field, re-prefixing any nested fields it owns.
    fn rename(&mut self, name: FieldName);
}

/// Fields in declaration order with unique names.
///
/// Updates return a new set and leave the original untouched.
#[derive(Debug, Clone)]
pub struct FieldSet<T> {
    fields: Vec<T>,
}

impl<T> Default for FieldSet<T> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<T: Named + Clone> FieldSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect fields, failing on the first repeated name.
    pub fn from_fields<I>(fields: I) -> ConfigurationResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let fields: Vec<T> = fields.into_iter().collect();
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name().as_str()) {
                return Err(ConfigurationError::duplicate_field(field.name().as_str()));
            }
        }
        Ok(Self { fields })
    }

    /// A copy of this set with `field` appended.
    pub fn with_field(&self, field: T) -> ConfigurationResult<Self> {
        if self.contains(field.name().as_str()) {
            return Err(ConfigurationError::duplicate_field(field.name().as_str()));
        }
        let mut fields = self.fields.clone();
        fields.push(field);
        Ok(Self { fields })
    }

    /// Look a field up by full name, falling back to its local name.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.position(name).map(|i| &self.fields[i])
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.position(name).map(|i| &mut self.fields[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name().as_str() == name)
    }

    /// A copy with every field renamed to `prefix.<local name>`.
    pub fn prefixed(&self, prefix: &FieldName) -> Self {
        let fields = self
            .fields
            .iter()
            .map(|field| {
                let mut field = field.clone();
                let name = field.name().prefixed(prefix);
                field.rename(name);
                field
            })
            .collect();
        Self { fields }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.fields.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.fields.iter_mut()
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name().as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name().as_str() == name)
            .or_else(|| self.fields.iter().position(|f| f.name().local_name() == name))
    }
}

impl<'a, T> IntoIterator for &'a FieldSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
