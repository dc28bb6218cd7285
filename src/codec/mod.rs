//! Field serialization and the type registry used to decode fields.
//!
//! Every field serializes to a [`SerializedField`]: a `type` tag, the name,
//! the optional flag, the default value, nested `fields` for composites and
//! variants, and the kind's constraint keys flattened alongside. Decoding
//! goes through a [`FieldRegistry`] owned by whoever builds the schema, so
//! custom kinds registered on one registry never leak into another.
//!
//! Closure-backed constraints added with `add_constraint`/`with_constraint`
//! are not part of the serialized shape.

use crate::error::{ConfigurationError, SchemaError, SchemaResult};
use crate::field::{AtomicField, AtomicKind, CompositeField, Field, MoneyConfig, VariantField};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Wire shape of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedField {
    #[serde(rename = "type")]
    pub field_type: String,
    pub name: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<SerializedField>,
    #[serde(flatten)]
    pub constraints: Map<String, Value>,
}

/// Turns a serialized field into a [`Field`]. Receives the registry so that
/// nested fields can be decoded too.
pub type Decoder = Arc<dyn Fn(&FieldRegistry, SerializedField) -> SchemaResult<Field> + Send + Sync>;

/// Map from type tag to decoder.
#[derive(Clone)]
pub struct FieldRegistry {
    decoders: BTreeMap<String, Decoder>,
}

impl FieldRegistry {
    /// A registry knowing every built-in kind.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for &tag in AtomicKind::TAGS {
            registry.register(tag, move |_, serialized| {
                Ok(AtomicField::deserialize_as(tag, serialized)?.into())
            });
        }
        registry.register("composite", decode_composite);
        registry.register("money", decode_money);
        registry.register("variant", decode_variant);
        registry
    }

    /// A registry with no decoders at all.
    pub fn empty() -> Self {
        Self {
            decoders: BTreeMap::new(),
        }
    }

    /// Add or replace the decoder for `tag`.
    pub fn register<F>(&mut self, tag: impl Into<String>, decoder: F)
    where
        F: Fn(&FieldRegistry, SerializedField) -> SchemaResult<Field> + Send + Sync + 'static,
    {
        let tag = tag.into();
        debug!("Registering field decoder for '{}'", tag);
        self.decoders.insert(tag, Arc::new(decoder));
    }

    pub fn with_decoder<F>(mut self, tag: impl Into<String>, decoder: F) -> Self
    where
        F: Fn(&FieldRegistry, SerializedField) -> SchemaResult<Field> + Send + Sync + 'static,
    {
        self.register(tag, decoder);
        self
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    pub fn tags(&self) -> Vec<&str> {
        self.decoders.keys().map(String::as_str).collect()
    }

    pub fn deserialize(&self, serialized: SerializedField) -> SchemaResult<Field> {
        let decoder = self
            .decoders
            .get(&serialized.field_type)
            .ok_or_else(|| SchemaError::unknown_type(&serialized.field_type))?;
        decoder(self, serialized)
    }

    pub fn from_value(&self, value: Value) -> SchemaResult<Field> {
        self.deserialize(serde_json::from_value(value)?)
    }

    pub fn from_json_str(&self, json: &str) -> SchemaResult<Field> {
        self.deserialize(serde_json::from_str(json)?)
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

fn expect_tag(expected: &str, serialized: &SerializedField) -> SchemaResult<()> {
    if serialized.field_type != expected {
        return Err(SchemaError::type_mismatch(expected, &serialized.field_type));
    }
    Ok(())
}

/// Decode nested fields, which must all be atomic.
fn decode_children(
    registry: &FieldRegistry,
    parent: &str,
    fields: Vec<SerializedField>,
) -> SchemaResult<Vec<AtomicField>> {
    fields
        .into_iter()
        .map(|child| -> SchemaResult<AtomicField> {
            match registry.deserialize(child)? {
                Field::Atomic(field) => Ok(field),
                other => Err(SchemaError::from(ConfigurationError::UnsupportedNesting {
                    field: format!("{}.{}", parent, other.name().local_name()),
                })),
            }
        })
        .collect()
}

fn decode_composite(registry: &FieldRegistry, serialized: SerializedField) -> SchemaResult<Field> {
    expect_tag("composite", &serialized)?;
    let fields = decode_children(registry, &serialized.name, serialized.fields)?;
    let mut field = CompositeField::new(&serialized.name, fields)?.with_optional(serialized.optional);
    if let Some(value) = serialized.value {
        field.prefill(value);
    }
    Ok(field.into())
}

fn decode_money(_: &FieldRegistry, serialized: SerializedField) -> SchemaResult<Field> {
    expect_tag("money", &serialized)?;
    let config: MoneyConfig = serde_json::from_value(Value::Object(serialized.constraints))?;
    let mut field = CompositeField::money(&serialized.name, config)?.with_optional(serialized.optional);
    if let Some(value) = serialized.value {
        field.prefill(value);
    }
    Ok(field.into())
}

fn decode_variant(registry: &FieldRegistry, serialized: SerializedField) -> SchemaResult<Field> {
    expect_tag("variant", &serialized)?;
    let candidates = decode_children(registry, &serialized.name, serialized.fields)?;
    let mut field = VariantField::new(&serialized.name, candidates)?.with_optional(serialized.optional);
    if let Some(value) = serialized.value {
        field.prefill(value);
    }
    Ok(field.into())
}
