//! Serialize, decode and validate again: results must not change.

use crate::common::fixtures::{every_kind, party};
use crate::common::status_tree;
use serde_json::json;
use typed_fields::codec::{FieldRegistry, SerializedField};
use typed_fields::error::SchemaError;
use typed_fields::result::Validated;
use typed_fields::Field;

#[test]
fn test_every_kind_survives_round_trip() {
    let registry = FieldRegistry::new();
    for (mut original, input) in every_kind() {
        let json = serde_json::to_string(&original.serialize().unwrap()).unwrap();
        let mut decoded = registry.from_json_str(&json).unwrap();

        assert_eq!(decoded.tag(), original.tag(), "{json}");
        assert_eq!(decoded.name(), original.name());
        assert_eq!(decoded.to_json().unwrap(), original.to_json().unwrap());

        let before = original.input(input.clone());
        let after = decoded.input(input);
        assert_eq!(status_tree(&after), status_tree(&before), "{json}");
        assert_eq!(after, before);
    }
}

#[test]
fn test_round_trip_keeps_optional_and_default() {
    let registry = FieldRegistry::new();
    let json = json!({"type": "integer", "name": "age", "optional": true, "value": 21, "min": 18});
    let field = registry.from_value(json.clone()).unwrap();
    assert!(field.is_optional());
    assert_eq!(field.resolved_value().raw(), Some(&json!(21)));
    assert_eq!(field.to_json().unwrap(), json);
}

#[test]
fn test_sub_field_defaults_survive_round_trip() {
    let registry = FieldRegistry::new();
    let originals: Vec<Field> = vec![
        party().into(),
        party().with_default(json!({"children": 0})).into(),
    ];

    for mut original in originals {
        let json = original.to_json().unwrap();
        assert_eq!(json["fields"][0]["value"], json!(2), "{json}");

        let mut decoded = registry.from_value(json.clone()).unwrap();
        assert_eq!(decoded.to_json().unwrap(), json);
        assert_eq!(decoded.resolved_value(), original.resolved_value());
        assert_eq!(decoded.resolved_value().raw().unwrap()["adults"], json!(2));
        assert!(decoded.validate().passed(), "{json}");
        assert_eq!(decoded.validate(), original.validate());

        let input = json!({"children": 3});
        assert_eq!(decoded.input(input.clone()), original.input(input));
    }
}

#[test]
fn test_serialized_shape_of_nested_fields() {
    let (variant, _) = every_kind().pop().unwrap();
    let serialized: SerializedField = variant.serialize().unwrap();
    assert_eq!(serialized.field_type, "variant");
    let tags: Vec<&str> = serialized.fields.iter().map(|f| f.field_type.as_str()).collect();
    assert_eq!(tags, vec!["passphrase", "password"]);
    let names: Vec<&str> = serialized.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["secret.passphrase", "secret.password"]);
}

#[test]
fn test_decoding_rejects_bad_documents() {
    let registry = FieldRegistry::new();
    assert!(matches!(
        registry.from_json_str(r#"{"name": "no_type"}"#),
        Err(SchemaError::Json(_))
    ));
    assert!(matches!(
        registry.from_value(json!({"type": "password", "name": "p", "policy": "lax"})),
        Err(SchemaError::Json(_) | SchemaError::Configuration(_))
    ));
    assert!(matches!(
        registry.from_value(json!({"type": "date", "name": "d", "step": "P1M"})),
        Err(SchemaError::Json(_) | SchemaError::Configuration(_))
    ));
}
