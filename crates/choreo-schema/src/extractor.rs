//! Schema extraction from shorthand field maps
//!
//! The extractor walks a field map in sorted key order. String values go
//! through the shorthand pipeline (type expression, then constraints), nested
//! maps become object schemas, and named types are looked up in the type table.
//!
//! Custom types are resolved at most once per extraction. Every use receives
//! its own clone of the cached node, and an explicit resolution stack turns
//! self-referential type graphs into a [`SchemaError::CyclicTypeReference`].

use ahash::AHashMap;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::FieldMap;
use crate::config::Config;
use crate::constraints::apply_constraints;
use crate::error::{ObjectDefaultError, SchemaError, ValueError, value_kind};
use crate::node::{AdditionalProperties, SchemaNode};
use crate::type_expr::TypeExpr;
use crate::validate::validate;

/// Reserved field map key holding the default of the whole object
pub const OBJECT_DEFAULT_KEY: &str = "$default";

/// Build an object schema from `fields`, resolving custom types from `types`.
///
/// Uses [`Config::default`]; see [`extract_schema_with_config`].
pub fn extract_schema(fields: &FieldMap, types: &FieldMap) -> Result<SchemaNode, SchemaError> {
    extract_schema_with_config(fields, types, &Config::default())
}

/// Build an object schema from `fields` with explicit extraction options.
///
/// # Errors
///
/// The first invalid shorthand, unknown or cyclic type, bad constraint value,
/// or unsatisfied default aborts the extraction. Errors inside a field are
/// wrapped in [`SchemaError::Field`].
pub fn extract_schema_with_config(
    fields: &FieldMap,
    types: &FieldMap,
    config: &Config,
) -> Result<SchemaNode, SchemaError> {
    let mut extractor = Extractor::new(types, config);
    extractor.build_object_schema(fields)
}

/// Per-call extraction state; dropped when the call returns
struct Extractor<'a> {
    types: &'a FieldMap,
    config: &'a Config,
    cache: AHashMap<String, SchemaNode>,
    /// Custom types currently being resolved, outermost first
    stack: Vec<String>,
}

impl<'a> Extractor<'a> {
    fn new(types: &'a FieldMap, config: &'a Config) -> Self {
        Self {
            types,
            config,
            cache: AHashMap::new(),
            stack: Vec::new(),
        }
    }

    fn build_object_schema(&mut self, fields: &FieldMap) -> Result<SchemaNode, SchemaError> {
        let mut entries: Vec<(&String, &Value)> = fields
            .iter()
            .filter(|(name, _)| name.as_str() != OBJECT_DEFAULT_KEY)
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut properties = IndexMap::with_capacity(entries.len());
        let mut required = Vec::new();
        for (name, value) in entries {
            let schema = self
                .build_field_schema(value)
                .map_err(|err| err.in_field(name))?;
            if schema.default.is_none() {
                required.push(name.clone());
            }
            properties.insert(name.clone(), schema);
        }

        let mut schema = SchemaNode::object(properties);
        schema.required = required;
        if self.config.additional_properties_false {
            schema.additional_properties = Some(AdditionalProperties::Bool(false));
        }

        if let Some(raw) = fields.get(OBJECT_DEFAULT_KEY) {
            let default = self
                .object_default(raw, &schema)
                .map_err(SchemaError::InvalidObjectDefault)?;
            schema.default = Some(default);
        }

        Ok(schema)
    }

    fn object_default(
        &self,
        raw: &Value,
        schema: &SchemaNode,
    ) -> Result<Value, ObjectDefaultError> {
        let default = match raw {
            Value::Object(map) => map.clone(),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => map,
                Ok(other) => {
                    return Err(ObjectDefaultError::NotAnObject {
                        kind: value_kind(&other),
                    });
                }
                Err(err) => {
                    return Err(ObjectDefaultError::InvalidJson(ValueError::InvalidJson(err)));
                }
            },
            other => {
                return Err(ObjectDefaultError::UnsupportedValue {
                    kind: value_kind(other),
                });
            }
        };

        let default = Value::Object(default);
        if !self.config.skip_default_validation {
            validate(schema, &default).map_err(ObjectDefaultError::Unsatisfied)?;
        }
        Ok(default)
    }

    fn build_field_schema(&mut self, value: &Value) -> Result<SchemaNode, SchemaError> {
        match value {
            Value::String(expr) => self.schema_from_string(expr),
            Value::Object(fields) => self.build_object_schema(fields),
            other => Err(SchemaError::UnsupportedFieldDefinition {
                kind: value_kind(other),
            }),
        }
    }

    /// `<type-expr> [| <constraints>]`; only the first `|` separates the two.
    fn schema_from_string(&mut self, expr: &str) -> Result<SchemaNode, SchemaError> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err(SchemaError::EmptyExpression);
        }

        let (type_part, constraint_part) = expr.split_once('|').unwrap_or((expr, ""));
        let type_expr = TypeExpr::parse(type_part)?;
        let mut schema = self.resolve(&type_expr)?;
        apply_constraints(&mut schema, constraint_part, self.config)?;
        Ok(schema)
    }

    fn resolve(&mut self, expr: &TypeExpr) -> Result<SchemaNode, SchemaError> {
        match expr {
            TypeExpr::Primitive(primitive) => Ok(SchemaNode::of_type(primitive.schema_type())),
            TypeExpr::Array(item) => Ok(SchemaNode::array(self.resolve(item)?)),
            TypeExpr::Map(value) => Ok(SchemaNode::map(self.resolve(value)?)),
            TypeExpr::Named(name) => self.resolve_named(name),
        }
    }

    fn resolve_named(&mut self, name: &str) -> Result<SchemaNode, SchemaError> {
        if let Some(cached) = self.cache.get(name) {
            debug!(type_name = name, "custom type cache hit");
            return Ok(cached.clone());
        }

        if let Some(start) = self.stack.iter().position(|entry| entry == name) {
            let mut chain: Vec<&str> = self.stack[start..].iter().map(String::as_str).collect();
            chain.push(name);
            return Err(SchemaError::CyclicTypeReference {
                name: name.to_string(),
                chain: chain.join(" -> "),
            });
        }

        let types = self.types;
        let Some(definition) = types.get(name) else {
            return Err(SchemaError::UnknownType {
                name: name.to_string(),
            });
        };
        if !matches!(definition, Value::String(_) | Value::Object(_)) {
            return Err(SchemaError::UnsupportedTypeDefinition {
                name: name.to_string(),
                kind: value_kind(definition),
            });
        }

        debug!(type_name = name, depth = self.stack.len(), "resolving custom type");
        self.stack.push(name.to_string());
        let resolved = self.build_field_schema(definition);
        self.stack.pop();

        let schema = resolved.map_err(|err| err.in_type(name))?;
        self.cache.insert(name.to_string(), schema.clone());
        Ok(schema)
    }
}
