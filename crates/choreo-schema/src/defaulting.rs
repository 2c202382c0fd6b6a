//! Defaulting of instance values
//!
//! Walks a value and a [`Structural`] schema in parallel and fills in missing
//! properties from their schema defaults. Existing values are never
//! overwritten; a `null` counts as missing. Array elements are not defaulted.

use serde_json::{Map, Value};

use crate::FieldMap;
use crate::node::SchemaType;
use crate::structural::Structural;

/// Apply schema defaults to `target` and return it.
///
/// A missing target becomes an empty object first. Without a schema the
/// target is returned untouched.
pub fn apply_defaults(target: Option<FieldMap>, structural: Option<&Structural>) -> FieldMap {
    let mut target = target.unwrap_or_default();
    if let Some(structural) = structural {
        default_object(&mut target, structural);
    }
    target
}

/// Apply schema defaults to any JSON value in place.
pub fn default_value(value: &mut Value, structural: &Structural) {
    if let Value::Object(map) = value {
        default_object(map, structural);
    }
}

fn default_object(map: &mut Map<String, Value>, structural: &Structural) {
    for (name, prop) in &structural.properties {
        let Some(default) = &prop.default else {
            continue;
        };
        match map.get_mut(name) {
            Some(existing) if !existing.is_null() => {}
            Some(existing) => *existing = default.clone(),
            None => {
                map.insert(name.clone(), default.clone());
            }
        }
    }

    for (name, value) in map.iter_mut() {
        if let Some(prop) = structural.properties.get(name) {
            default_value(value, prop);
        } else if let Some(values) = &structural.additional_properties {
            default_value(value, values);
        }
    }
}

/// Fully defaulted value for an empty input.
///
/// Nested objects without a non-empty default of their own are created empty
/// first so that their children's defaults have somewhere to go. Arrays
/// without a default become `[]`; no items are invented.
pub fn default_skeleton(structural: &Structural) -> FieldMap {
    apply_defaults(Some(empty_structure(structural)), Some(structural))
}

fn empty_structure(structural: &Structural) -> FieldMap {
    let mut result = Map::new();
    for (name, prop) in &structural.properties {
        if !is_empty_default(prop.default.as_ref()) {
            continue;
        }
        match prop.schema_type {
            SchemaType::Object if !prop.properties.is_empty() => {
                result.insert(name.clone(), Value::Object(empty_structure(prop)));
            }
            SchemaType::Array => {
                result.insert(name.clone(), Value::Array(Vec::new()));
            }
            _ => {}
        }
    }
    result
}

fn is_empty_default(default: Option<&Value>) -> bool {
    match default {
        None | Some(Value::Null) => true,
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::SchemaNode;
    use crate::structural::to_structural;
    use serde_json::json;

    fn structural(schema: Value) -> Structural {
        let node: SchemaNode = serde_json::from_value(schema).unwrap();
        to_structural(&node).unwrap()
    }

    fn object(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    fn service_schema() -> Structural {
        structural(json!({
            "type": "object",
            "properties": {
                "image": {"type": "string"},
                "replicas": {"type": "integer", "default": 1},
                "resources": {
                    "type": "object",
                    "properties": {
                        "cpu": {"type": "string", "default": "100m"},
                        "memory": {"type": "string", "default": "128Mi"}
                    }
                },
                "ports": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {"protocol": {"type": "string", "default": "TCP"}}
                    }
                },
                "labels": {
                    "type": "object",
                    "additionalProperties": {
                        "type": "object",
                        "properties": {"enabled": {"type": "boolean", "default": true}}
                    }
                }
            }
        }))
    }

    #[test]
    fn test_fills_missing_fields_only() {
        let result = apply_defaults(
            Some(object(json!({"image": "nginx", "replicas": 3}))),
            Some(&service_schema()),
        );
        assert_eq!(Value::Object(result), json!({"image": "nginx", "replicas": 3}));

        let result = apply_defaults(
            Some(object(json!({"image": "nginx"}))),
            Some(&service_schema()),
        );
        assert_eq!(Value::Object(result), json!({"image": "nginx", "replicas": 1}));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let result = apply_defaults(
            Some(object(json!({"replicas": null}))),
            Some(&service_schema()),
        );
        assert_eq!(result["replicas"], json!(1));
    }

    #[test]
    fn test_nested_objects_and_map_values() {
        let result = apply_defaults(
            Some(object(json!({
                "resources": {"cpu": "2"},
                "labels": {"team": {}}
            }))),
            Some(&service_schema()),
        );
        assert_eq!(result["resources"], json!({"cpu": "2", "memory": "128Mi"}));
        assert_eq!(result["labels"], json!({"team": {"enabled": true}}));
    }

    #[test]
    fn test_array_elements_are_not_defaulted() {
        let result = apply_defaults(
            Some(object(json!({"ports": [{"port": 80}]}))),
            Some(&service_schema()),
        );
        assert_eq!(result["ports"], json!([{"port": 80}]));
    }

    #[test]
    fn test_missing_target_and_schema() {
        assert_eq!(
            Value::Object(apply_defaults(None, Some(&service_schema()))),
            json!({"replicas": 1})
        );
        let target = object(json!({"a": 1}));
        assert_eq!(apply_defaults(Some(target.clone()), None), target);
        assert!(apply_defaults(None, None).is_empty());
    }

    #[test]
    fn test_defaults_inside_defaults() {
        let schema = structural(json!({
            "type": "object",
            "properties": {
                "db": {
                    "type": "object",
                    "default": {"host": "localhost"},
                    "properties": {
                        "host": {"type": "string"},
                        "port": {"type": "integer", "default": 5432}
                    }
                }
            }
        }));
        let result = apply_defaults(None, Some(&schema));
        assert_eq!(result["db"], json!({"host": "localhost", "port": 5432}));
    }

    #[test]
    fn test_default_skeleton() {
        let skeleton = default_skeleton(&service_schema());
        assert_eq!(
            Value::Object(skeleton),
            json!({
                "replicas": 1,
                "resources": {"cpu": "100m", "memory": "128Mi"},
                "ports": []
            })
        );
    }

    #[test]
    fn test_skeleton_arrays() {
        let schema = structural(json!({
            "type": "object",
            "properties": {
                "tags": {"type": "array", "items": {"type": "string"}},
                "hosts": {
                    "type": "array",
                    "default": ["localhost"],
                    "items": {"type": "string"}
                },
                "db": {
                    "type": "object",
                    "properties": {
                        "replicas": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {"host": {"type": "string"}}
                            }
                        }
                    }
                }
            }
        }));
        assert_eq!(
            Value::Object(default_skeleton(&schema)),
            json!({
                "tags": [],
                "hosts": ["localhost"],
                "db": {"replicas": []}
            })
        );
    }
}
