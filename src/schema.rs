//! Schemas: named, ordered collections of fields validated together.
//!
//! A [`Schema`] is assembled with a [`SchemaBuilder`], either from fields
//! built in code or from serialized fields decoded through a
//! [`FieldRegistry`]. Input arrives as a decoded JSON object keyed by field
//! name; keys that name no field are logged and ignored.

use crate::codec::{FieldRegistry, SerializedField};
use crate::error::SchemaResult;
use crate::field::{Field, FieldSet};
use crate::result::{SchemaValidationResult, Validated};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaConfig {
    /// Name reported on the schema's validation result.
    pub name: String,

    /// Validate each field as soon as it receives input. When false, input
    /// is only stored and checked by [`Schema::validate`].
    pub validate_on_input: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            name: "schema".to_string(),
            validate_on_input: true,
        }
    }
}

/// An ordered set of uniquely named fields.
#[derive(Debug, Clone)]
pub struct Schema {
    config: SchemaConfig,
    fields: FieldSet<Field>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Build a schema from a JSON array of serialized fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, names an unregistered field
    /// type, carries an invalid constraint configuration, or repeats a field
    /// name.
    pub fn from_json(json: &str, registry: FieldRegistry) -> SchemaResult<Self> {
        SchemaBuilder::new()
            .with_registry(registry)
            .decode_json(json)?
            .build()
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    pub fn fields(&self) -> &FieldSet<Field> {
        &self.fields
    }

    /// Field by full or local name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Feed input values to the fields they name.
    ///
    /// Fields not mentioned keep their current input.
    pub fn input(&mut self, values: &Map<String, Value>) {
        let validate = self.config.validate_on_input;
        for (key, value) in values {
            let Some(field) = self.fields.get_mut(key) else {
                warn!("Schema '{}' ignoring unknown input key '{}'", self.config.name, key);
                continue;
            };
            if validate {
                let result = field.input(value.clone());
                debug!("Field '{}' on input: {}", key, result.status());
            } else {
                field.input_deferred(value.clone());
            }
        }
    }

    /// Set default values on the fields they name.
    pub fn prefill(&mut self, defaults: &Map<String, Value>) {
        for (key, value) in defaults {
            match self.fields.get_mut(key) {
                Some(field) => field.prefill(value.clone()),
                None => warn!("Schema '{}' ignoring unknown default '{}'", self.config.name, key),
            }
        }
    }

    /// Validate every field. Produces one entry per field.
    pub fn validate(&self) -> SchemaValidationResult {
        let result =
            SchemaValidationResult::new(self.config.name.as_str(), self.fields.iter().map(Field::validate));
        debug!("Schema '{}' validated: {}", self.config.name, result.status());
        result
    }

    pub fn serialize(&self) -> SchemaResult<Vec<SerializedField>> {
        self.fields.iter().map(Field::serialize).collect()
    }

    pub fn to_json(&self) -> SchemaResult<Value> {
        Ok(serde_json::to_value(self.serialize()?)?)
    }
}

enum Entry {
    Built(Field),
    Serialized(SerializedField),
}

/// Fluent builder for [`Schema`].
///
/// Serialized fields are decoded in [`SchemaBuilder::build`], against
/// whichever registry is set by then.
///
/// ```rust
/// use typed_fields::field::{AtomicField, AtomicKind};
/// use typed_fields::schema::SchemaBuilder;
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let schema = SchemaBuilder::new()
///     .with_name("signup")
///     .field(AtomicField::new("email", AtomicKind::Email)?)
///     .decode_json(r#"[{"type": "boolean", "name": "newsletter", "optional": true}]"#)?
///     .build()?;
/// assert_eq!(schema.fields().names(), vec!["email", "newsletter"]);
/// # Ok(())
/// # }
/// ```
pub struct SchemaBuilder {
    config: SchemaConfig,
    registry: FieldRegistry,
    entries: Vec<Entry>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            config: SchemaConfig::default(),
            registry: FieldRegistry::new(),
            entries: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: SchemaConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn with_validate_on_input(mut self, validate_on_input: bool) -> Self {
        self.config.validate_on_input = validate_on_input;
        self
    }

    pub fn with_registry(mut self, registry: FieldRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn field(mut self, field: impl Into<Field>) -> Self {
        self.entries.push(Entry::Built(field.into()));
        self
    }

    pub fn decode_field(mut self, serialized: SerializedField) -> Self {
        self.entries.push(Entry::Serialized(serialized));
        self
    }

    /// Queue every field in a JSON array of serialized fields.
    pub fn decode_json(mut self, json: &str) -> SchemaResult<Self> {
        let fields: Vec<SerializedField> = serde_json::from_str(json)?;
        self.entries.extend(fields.into_iter().map(Entry::Serialized));
        Ok(self)
    }

    pub fn build(self) -> SchemaResult<Schema> {
        let registry = self.registry;
        let fields = self
            .entries
            .into_iter()
            .map(|entry| match entry {
                Entry::Built(field) => Ok(field),
                Entry::Serialized(serialized) => registry.deserialize(serialized),
            })
            .collect::<SchemaResult<Vec<Field>>>()?;
        let fields = FieldSet::from_fields(fields)?;
        debug!("Built schema '{}' with {} fields", self.config.name, fields.len());
        Ok(Schema {
            config: self.config,
            fields,
        })
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
