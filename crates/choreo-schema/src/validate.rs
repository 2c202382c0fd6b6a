//! Value validation against a generated schema
//!
//! Checks the keywords the extractor can emit: `type`, `enum`, numeric
//! bounds and `multipleOf`, string length and `pattern`, array bounds,
//! `uniqueItems` and `items`, object `required`, property counts,
//! `properties` and `additionalProperties`. `format` is informational and is
//! not checked.
//!
//! Used to check `default`/`$default` values during extraction, and exposed
//! for checking instance values.

mod context;
mod error;

use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::error::value_kind;
use crate::node::{AdditionalProperties, SchemaNode, SchemaType};

use context::ValidationContext;
pub use context::{InstancePath, PathSegment};
pub use error::{ValidationError, ValidationErrors};

const MULTIPLE_OF_EPSILON: f64 = 1e-9;

/// Validate `value` against `schema`, collecting every violation.
pub fn validate(schema: &SchemaNode, value: &Value) -> Result<(), ValidationErrors> {
    let mut ctx = ValidationContext::new();
    validate_node(&mut ctx, schema, value);
    ctx.finish()
}

fn validate_node(ctx: &mut ValidationContext, schema: &SchemaNode, value: &Value) {
    if let Some(expected) = schema.schema_type
        && !type_matches(expected, value)
    {
        ctx.record(ValidationError::TypeMismatch {
            expected,
            actual: value_kind(value),
            path: ctx.path(),
        });
        return;
    }

    if let Some(allowed) = &schema.enum_values
        && !allowed.iter().any(|candidate| json_equal(candidate, value))
    {
        ctx.record(ValidationError::NotInEnum {
            value: value.to_string(),
            allowed: Value::Array(allowed.clone()).to_string(),
            path: ctx.path(),
        });
    }

    match value {
        Value::Number(n) => validate_number(ctx, schema, n),
        Value::String(s) => validate_string(ctx, schema, s),
        Value::Array(items) => validate_array(ctx, schema, items),
        Value::Object(map) => validate_object(ctx, schema, map),
        Value::Null | Value::Bool(_) => {}
    }
}

fn type_matches(expected: SchemaType, value: &Value) -> bool {
    match (expected, value) {
        (SchemaType::String, Value::String(_)) => true,
        (SchemaType::Boolean, Value::Bool(_)) => true,
        (SchemaType::Number, Value::Number(_)) => true,
        (SchemaType::Integer, Value::Number(n)) => is_integral(n),
        (SchemaType::Array, Value::Array(_)) => true,
        (SchemaType::Object, Value::Object(_)) => true,
        _ => false,
    }
}

fn is_integral(n: &Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
}

fn validate_number(ctx: &mut ValidationContext, schema: &SchemaNode, n: &Number) {
    let Some(v) = n.as_f64() else {
        return;
    };

    if let Some(min) = &schema.minimum {
        let bound = min.as_f64().unwrap_or(f64::MIN);
        let (ok, comparison) = if schema.exclusive_minimum {
            (v > bound, "greater than")
        } else {
            (v >= bound, "greater than or equal to")
        };
        if !ok {
            ctx.record(ValidationError::OutOfRange {
                value: n.to_string(),
                comparison,
                bound: min.to_string(),
                path: ctx.path(),
            });
        }
    }

    if let Some(max) = &schema.maximum {
        let bound = max.as_f64().unwrap_or(f64::MAX);
        let (ok, comparison) = if schema.exclusive_maximum {
            (v < bound, "less than")
        } else {
            (v <= bound, "less than or equal to")
        };
        if !ok {
            ctx.record(ValidationError::OutOfRange {
                value: n.to_string(),
                comparison,
                bound: max.to_string(),
                path: ctx.path(),
            });
        }
    }

    if let Some(divisor) = &schema.multiple_of
        && !is_multiple_of(n, divisor)
    {
        ctx.record(ValidationError::NotMultipleOf {
            value: n.to_string(),
            divisor: divisor.to_string(),
            path: ctx.path(),
        });
    }
}

fn is_multiple_of(n: &Number, divisor: &Number) -> bool {
    if let (Some(v), Some(d)) = (n.as_i64(), divisor.as_i64()) {
        return v.checked_rem(d).is_none_or(|rem| rem == 0);
    }
    match (n.as_f64(), divisor.as_f64()) {
        (Some(v), Some(d)) if d != 0.0 => {
            let quotient = v / d;
            (quotient - quotient.round()).abs() < MULTIPLE_OF_EPSILON
        }
        _ => true,
    }
}

fn validate_string(ctx: &mut ValidationContext, schema: &SchemaNode, s: &str) {
    let length = s.chars().count();

    if let Some(min) = schema.min_length
        && (length as u64) < min
    {
        ctx.record(ValidationError::LengthOutOfBounds {
            length,
            comparison: "at least",
            bound: min,
            path: ctx.path(),
        });
    }

    if let Some(max) = schema.max_length
        && (length as u64) > max
    {
        ctx.record(ValidationError::LengthOutOfBounds {
            length,
            comparison: "at most",
            bound: max,
            path: ctx.path(),
        });
    }

    if let Some(pattern) = &schema.pattern {
        match Regex::new(pattern) {
            Ok(regex) if !regex.is_match(s) => {
                ctx.record(ValidationError::PatternMismatch {
                    value: s.to_string(),
                    pattern: pattern.clone(),
                    path: ctx.path(),
                });
            }
            Ok(_) => {}
            Err(e) => {
                ctx.record(ValidationError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                    path: ctx.path(),
                });
            }
        }
    }
}

fn validate_array(ctx: &mut ValidationContext, schema: &SchemaNode, items: &[Value]) {
    let count = items.len();

    if let Some(min) = schema.min_items
        && (count as u64) < min
    {
        ctx.record(ValidationError::ItemCountOutOfBounds {
            count,
            comparison: "at least",
            bound: min,
            path: ctx.path(),
        });
    }

    if let Some(max) = schema.max_items
        && (count as u64) > max
    {
        ctx.record(ValidationError::ItemCountOutOfBounds {
            count,
            comparison: "at most",
            bound: max,
            path: ctx.path(),
        });
    }

    if schema.unique_items
        && let Some(index) =
            (1..count).find(|&i| items[..i].iter().any(|prev| json_equal(prev, &items[i])))
    {
        ctx.record(ValidationError::DuplicateItem {
            index,
            path: ctx.path(),
        });
    }

    if let Some(item_schema) = &schema.items {
        for (index, item) in items.iter().enumerate() {
            ctx.push_index(index);
            validate_node(ctx, item_schema, item);
            ctx.pop();
        }
    }
}

fn validate_object(ctx: &mut ValidationContext, schema: &SchemaNode, map: &Map<String, Value>) {
    let count = map.len();

    if let Some(min) = schema.min_properties
        && (count as u64) < min
    {
        ctx.record(ValidationError::PropertyCountOutOfBounds {
            count,
            comparison: "at least",
            bound: min,
            path: ctx.path(),
        });
    }

    if let Some(max) = schema.max_properties
        && (count as u64) > max
    {
        ctx.record(ValidationError::PropertyCountOutOfBounds {
            count,
            comparison: "at most",
            bound: max,
            path: ctx.path(),
        });
    }

    for field in &schema.required {
        if !map.contains_key(field) {
            ctx.record(ValidationError::MissingRequiredField {
                field: field.clone(),
                path: ctx.path().child(field),
            });
        }
    }

    for (key, child) in map {
        if let Some(prop) = schema.property(key) {
            ctx.push_key(key);
            validate_node(ctx, prop, child);
            ctx.pop();
            continue;
        }

        match &schema.additional_properties {
            Some(AdditionalProperties::Schema(values)) => {
                ctx.push_key(key);
                validate_node(ctx, values, child);
                ctx.pop();
            }
            Some(AdditionalProperties::Bool(false)) => {
                ctx.record(ValidationError::UnknownField {
                    field: key.clone(),
                    path: ctx.path(),
                });
            }
            Some(AdditionalProperties::Bool(true)) | None => {}
        }
    }
}

/// JSON equality where `1` and `1.0` compare equal.
fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, xv)| y.get(k).is_some_and(|yv| json_equal(xv, yv)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;

    fn schema(value: Value) -> SchemaNode {
        serde_json::from_value(value).unwrap()
    }

    fn errors(schema: &SchemaNode, value: Value) -> Vec<ValidationError> {
        validate(schema, &value).unwrap_err().into_vec()
    }

    #[test]
    fn test_type_mismatch_stops_further_checks() {
        let s = schema(json!({"type": "integer", "minimum": 5}));
        let errs = errors(&s, json!("3"));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].to_string(), "$: expected integer, got string");
    }

    #[test]
    fn test_multiple_of_extreme_integers() {
        let s = schema(json!({"type": "integer", "multipleOf": -1}));
        assert!(validate(&s, &json!(i64::MIN)).is_ok());

        let s = schema(json!({"type": "integer", "multipleOf": 0}));
        assert!(validate(&s, &json!(7)).is_ok());

        let s = schema(json!({"type": "integer", "multipleOf": 3}));
        assert!(validate(&s, &json!(i64::MIN)).is_err());
    }

    #[test]
    fn test_integer_accepts_integral_float() {
        let s = schema(json!({"type": "integer"}));
        assert!(validate(&s, &json!(2.0)).is_ok());
        assert!(validate(&s, &json!(2.5)).is_err());
        assert!(validate(&s, &json!(null)).is_err());
    }

    #[test]
    fn test_numeric_bounds() {
        let s = schema(json!({"type": "integer", "minimum": 1, "maximum": 65535}));
        assert!(validate(&s, &json!(1)).is_ok());
        assert!(validate(&s, &json!(65535)).is_ok());
        let errs = errors(&s, json!(0));
        assert_eq!(errs[0].to_string(), "$: 0 must be greater than or equal to 1");

        let s = schema(json!({"type": "number", "minimum": 0, "exclusiveMinimum": true}));
        assert!(validate(&s, &json!(0)).is_err());
        assert!(validate(&s, &json!(0.1)).is_ok());

        let s = schema(json!({"type": "number", "maximum": 1, "exclusiveMaximum": true}));
        assert!(validate(&s, &json!(1)).is_err());
    }

    #[test]
    fn test_multiple_of() {
        let s = schema(json!({"type": "integer", "multipleOf": 5}));
        assert!(validate(&s, &json!(15)).is_ok());
        assert!(validate(&s, &json!(16)).is_err());

        let s = schema(json!({"type": "number", "multipleOf": 0.1}));
        assert!(validate(&s, &json!(0.3)).is_ok());
        assert!(validate(&s, &json!(0.35)).is_err());
    }

    #[test]
    fn test_string_constraints() {
        let s = schema(json!({
            "type": "string", "minLength": 2, "maxLength": 4, "pattern": "^[a-z]+$"
        }));
        assert!(validate(&s, &json!("abc")).is_ok());
        let errs = errors(&s, json!("ABCDE"));
        assert_eq!(errs.len(), 2);
        assert!(matches!(errs[0], ValidationError::LengthOutOfBounds { length: 5, .. }));
        assert!(matches!(errs[1], ValidationError::PatternMismatch { .. }));
    }

    #[test]
    fn test_string_length_counts_chars() {
        let s = schema(json!({"type": "string", "maxLength": 3}));
        assert!(validate(&s, &json!("äöü")).is_ok());
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let s = schema(json!({"type": "string", "pattern": "("}));
        assert!(matches!(
            errors(&s, json!("x"))[0],
            ValidationError::InvalidPattern { .. }
        ));
    }

    #[test]
    fn test_enum_membership() {
        let s = schema(json!({"type": "string", "enum": ["debug", "info"]}));
        assert!(validate(&s, &json!("info")).is_ok());
        let errs = errors(&s, json!("trace"));
        assert_eq!(
            errs[0].to_string(),
            r#"$: "trace" is not one of ["debug","info"]"#
        );

        let s = schema(json!({"type": "number", "enum": [1, 2.5]}));
        assert!(validate(&s, &json!(1.0)).is_ok());
    }

    #[test]
    fn test_array_constraints() {
        let s = schema(json!({
            "type": "array",
            "minItems": 1,
            "maxItems": 3,
            "uniqueItems": true,
            "items": {"type": "integer", "minimum": 0}
        }));
        assert!(validate(&s, &json!([0, 1, 2])).is_ok());
        assert!(validate(&s, &json!([])).is_err());

        let errs = errors(&s, json!([1, -1, 1]));
        assert_eq!(errs.len(), 2);
        assert!(matches!(errs[0], ValidationError::DuplicateItem { index: 2, .. }));
        assert_eq!(errs[1].path().to_string(), "$[1]");
    }

    #[test]
    fn test_object_required_and_nested_paths() {
        let s = schema(json!({
            "type": "object",
            "required": ["a", "db"],
            "properties": {
                "a": {"type": "integer"},
                "db": {
                    "type": "object",
                    "required": ["host"],
                    "properties": {"host": {"type": "string"}}
                }
            }
        }));
        assert!(validate(&s, &json!({"a": 1, "db": {"host": "x"}})).is_ok());

        let errs = errors(&s, json!({"db": {}}));
        let messages: Vec<String> = errs.iter().map(ToString::to_string).collect();
        assert_eq!(messages, vec!["$.a is required", "$.db.host is required"]);
    }

    #[test]
    fn test_additional_properties() {
        let closed = schema(json!({
            "type": "object",
            "properties": {"a": {"type": "integer"}},
            "additionalProperties": false
        }));
        let errs = errors(&closed, json!({"a": 1, "b": 2}));
        assert_eq!(errs[0].to_string(), r#"$: field "b" is not allowed"#);

        let map = SchemaNode::map(SchemaNode::of_type(SchemaType::String));
        assert!(validate(&map, &json!({"x": "1", "y": "2"})).is_ok());
        let errs = errors(&map, json!({"x": 1}));
        assert_eq!(errs[0].path().to_string(), "$.x");

        let open = SchemaNode::object(IndexMap::new());
        assert!(validate(&open, &json!({"anything": [1]})).is_ok());
    }

    #[test]
    fn test_property_counts() {
        let s = schema(json!({"type": "object", "minProperties": 1, "maxProperties": 1}));
        assert!(validate(&s, &json!({"a": 1})).is_ok());
        assert!(validate(&s, &json!({})).is_err());
        assert!(validate(&s, &json!({"a": 1, "b": 2})).is_err());
    }

    #[test]
    fn test_errors_display_joined() {
        let s = schema(json!({
            "type": "object",
            "required": ["a", "b"],
            "properties": {"a": {"type": "string"}, "b": {"type": "string"}}
        }));
        let err = validate(&s, &json!({})).unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err.to_string(), "$.a is required; $.b is required");
    }
}
