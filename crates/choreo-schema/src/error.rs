//! Error types for the choreo-schema crate

use thiserror::Error;

use crate::structural::StructuralError;
use crate::validate::ValidationErrors;

/// Errors raised while turning a raw token into a typed value
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("empty {kind} value")]
    Empty { kind: &'static str },

    #[error("{0}")]
    InvalidInteger(#[from] std::num::ParseIntError),

    #[error("{0}")]
    InvalidNumber(#[from] std::num::ParseFloatError),

    #[error("number {0:?} is not finite")]
    NonFiniteNumber(String),

    #[error("{0} is not greater than zero")]
    NotPositive(String),

    #[error("invalid boolean {0:?}")]
    InvalidBoolean(String),

    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Errors raised while extracting a schema from shorthand field maps
///
/// Every error is fatal for the whole definition; there is no partial result.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Error inside a named field, rendered as `field "name": ...`
    #[error("field {name:?}: {source}")]
    Field {
        name: String,
        #[source]
        source: Box<SchemaError>,
    },

    /// Error while resolving a custom type definition
    #[error("type {name:?}: {source}")]
    TypeDefinition {
        name: String,
        #[source]
        source: Box<SchemaError>,
    },

    #[error("empty schema expression")]
    EmptyExpression,

    #[error("empty type expression in {expr:?}")]
    EmptyTypeExpression { expr: String },

    #[error(
        "'object' type is not allowed; use a map type (e.g., 'map<string>') for free-form objects or define a structured type with explicit properties"
    )]
    ObjectTypeNotAllowed,

    #[error("invalid map type expression {expr:?}")]
    InvalidMapType { expr: String },

    #[error("map key type must be 'string', got {key:?} in {expr:?}")]
    NonStringMapKey { key: String, expr: String },

    #[error("unknown type {name:?}")]
    UnknownType { name: String },

    #[error("detected cyclic type reference involving {name:?} ({chain})")]
    CyclicTypeReference { name: String, chain: String },

    #[error("unsupported field definition of type {kind}")]
    UnsupportedFieldDefinition { kind: &'static str },

    #[error("unsupported custom type definition for {name:?} (type {kind})")]
    UnsupportedTypeDefinition { name: String, kind: &'static str },

    #[error("constraint marker {marker:?} is missing a value (should be in format 'key=value')")]
    MissingMarkerValue { marker: String },

    #[error("marker \"required\" is not allowed - use default values to make fields optional")]
    RequiredMarkerNotAllowed,

    #[error("unknown constraint marker {marker:?}")]
    UnknownMarker { marker: String },

    #[error("invalid {marker} {value:?}: {source}")]
    InvalidConstraintValue {
        marker: &'static str,
        value: String,
        #[source]
        source: ValueError,
    },

    #[error("invalid enum value {value:?}: {source}")]
    InvalidEnumValue {
        value: String,
        #[source]
        source: ValueError,
    },

    #[error("enum {value:?} does not list any values")]
    EmptyEnum { value: String },

    #[error("invalid default value: default value does not satisfy schema constraints: {0}")]
    InvalidDefault(ValidationErrors),

    #[error("invalid $default: {0}")]
    InvalidObjectDefault(ObjectDefaultError),

    #[error("failed to build structural schema: {0}")]
    Structural(#[from] StructuralError),
}

impl SchemaError {
    /// Strip `Field` and `TypeDefinition` context and return the underlying error.
    pub fn root_cause(&self) -> &SchemaError {
        match self {
            SchemaError::Field { source, .. } | SchemaError::TypeDefinition { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }

    pub(crate) fn in_field(self, name: &str) -> Self {
        SchemaError::Field {
            name: name.to_string(),
            source: Box::new(self),
        }
    }

    pub(crate) fn in_type(self, name: &str) -> Self {
        SchemaError::TypeDefinition {
            name: name.to_string(),
            source: Box::new(self),
        }
    }
}

/// Reasons an object-level `$default` is rejected
#[derive(Debug, Error)]
pub enum ObjectDefaultError {
    #[error("value is not a valid object: {0}")]
    InvalidJson(ValueError),

    #[error("value must be an object, got {kind}")]
    NotAnObject { kind: &'static str },

    #[error("value must be an object or JSON string, got {kind}")]
    UnsupportedValue { kind: &'static str },

    #[error("default value does not satisfy schema: {0}")]
    Unsatisfied(ValidationErrors),
}

/// JSON kind name used in error messages
pub(crate) fn value_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_context_renders_path() {
        let err = SchemaError::UnknownType {
            name: "Db".to_string(),
        }
        .in_type("Config")
        .in_field("database");
        assert_eq!(
            err.to_string(),
            r#"field "database": type "Config": unknown type "Db""#
        );
        assert!(matches!(
            err.root_cause(),
            SchemaError::UnknownType { name } if name == "Db"
        ));
    }

    #[test]
    fn test_required_marker_message() {
        assert!(
            SchemaError::RequiredMarkerNotAllowed
                .to_string()
                .contains("marker \"required\" is not allowed")
        );
    }

    #[test]
    fn test_value_kind_names() {
        use serde_json::json;
        assert_eq!(value_kind(&json!(1)), "integer");
        assert_eq!(value_kind(&json!(1.5)), "number");
        assert_eq!(value_kind(&json!([])), "array");
        assert_eq!(value_kind(&json!(null)), "null");
    }
}
