//! Typed parsing of raw constraint values
//!
//! `default` and `enum` values are parsed according to the type of the field
//! they constrain; `example` values are parsed best-effort.

use serde_json::{Number, Value};

use crate::error::ValueError;
use crate::node::SchemaType;
use crate::tokenize::unquote_if_needed;

/// Parse `raw` into a JSON value appropriate for `schema_type`.
///
/// Without a known type the value is parsed best-effort: JSON, then boolean,
/// integer and float, falling back to the raw string.
pub fn parse_value_for_type(
    raw: &str,
    schema_type: Option<SchemaType>,
) -> Result<Value, ValueError> {
    match schema_type {
        Some(SchemaType::String) => Ok(Value::String(unquote_if_needed(raw))),
        Some(SchemaType::Integer) => {
            if raw.is_empty() {
                return Err(ValueError::Empty { kind: "integer" });
            }
            Ok(Value::from(raw.parse::<i64>()?))
        }
        Some(SchemaType::Number) => {
            if raw.is_empty() {
                return Err(ValueError::Empty { kind: "number" });
            }
            Ok(Value::Number(parse_number(raw)?))
        }
        Some(SchemaType::Boolean) => Ok(Value::Bool(parse_bool(raw)?)),
        Some(kind @ (SchemaType::Array | SchemaType::Object)) => {
            if raw.trim().is_empty() {
                return Err(ValueError::Empty {
                    kind: kind.as_str(),
                });
            }
            Ok(serde_json::from_str(raw)?)
        }
        None => Ok(parse_untyped(raw)),
    }
}

/// Best-effort parse used by the `example` constraint.
///
/// Values starting with `{` or `[` must be valid JSON. Otherwise the value
/// becomes a boolean, integer or float when it parses as one, or a string.
pub fn parse_arbitrary_value(raw: &str) -> Result<Value, ValueError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Value::String(String::new()));
    }
    if raw.starts_with('{') || raw.starts_with('[') {
        return Ok(serde_json::from_str(raw)?);
    }
    Ok(parse_scalar(raw).unwrap_or_else(|| Value::String(unquote_if_needed(raw))))
}

fn parse_untyped(raw: &str) -> Value {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return value;
    }
    parse_scalar(raw).unwrap_or_else(|| Value::String(raw.to_string()))
}

fn parse_scalar(raw: &str) -> Option<Value> {
    if let Ok(b) = parse_bool(raw) {
        return Some(Value::Bool(b));
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Value::from(i));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Parse a numeric constraint value.
///
/// Integral text stays an integer so `minimum=1` serializes as `1`, not `1.0`.
pub fn parse_number(raw: &str) -> Result<Number, ValueError> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    let f = raw.parse::<f64>()?;
    Number::from_f64(f).ok_or_else(|| ValueError::NonFiniteNumber(raw.to_string()))
}

/// Strict boolean parsing.
///
/// Accepts `1`, `t`, `T`, `true`, `True`, `TRUE` and their false
/// counterparts; anything else (including `yes`/`no`) is rejected.
pub fn parse_bool(raw: &str) -> Result<bool, ValueError> {
    match raw {
        "1" | "t" | "T" | "true" | "True" | "TRUE" => Ok(true),
        "0" | "f" | "F" | "false" | "False" | "FALSE" => Ok(false),
        other => Err(ValueError::InvalidBoolean(other.to_string())),
    }
}
