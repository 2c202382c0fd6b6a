//! Type expressions of the shorthand syntax
//!
//! ```text
//! type-expr := "string" | "integer" | "number" | "boolean"
//!            | "[]" type-expr | "array<" type-expr ">"
//!            | "map<" type-expr ">" | "map[string]" type-expr
//!            | custom-type-name
//! ```
//!
//! Parsing produces a small AST so that grammar checks live in one place and
//! resolution never slices strings.

use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;
use crate::node::SchemaType;

/// Built-in scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Integer,
    Number,
    Boolean,
}

impl Primitive {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(Primitive::String),
            "integer" => Some(Primitive::Integer),
            "number" => Some(Primitive::Number),
            "boolean" => Some(Primitive::Boolean),
            _ => None,
        }
    }

    pub fn schema_type(self) -> SchemaType {
        match self {
            Primitive::String => SchemaType::String,
            Primitive::Integer => SchemaType::Integer,
            Primitive::Number => SchemaType::Number,
            Primitive::Boolean => SchemaType::Boolean,
        }
    }
}

/// Parsed type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Primitive(Primitive),
    /// `[]T` or `array<T>`
    Array(Box<TypeExpr>),
    /// `map<T>` or `map[string]T`; keys are always strings
    Map(Box<TypeExpr>),
    /// Reference into the custom type table
    Named(String),
}

impl TypeExpr {
    /// Parse a type expression; surrounding whitespace is ignored.
    pub fn parse(expr: &str) -> Result<Self, SchemaError> {
        parse_inner(expr.trim(), expr)
    }
}

impl FromStr for TypeExpr {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeExpr::parse(s)
    }
}

fn parse_inner(expr: &str, whole: &str) -> Result<TypeExpr, SchemaError> {
    if expr.is_empty() {
        return Err(SchemaError::EmptyTypeExpression {
            expr: whole.trim().to_string(),
        });
    }

    if let Some(primitive) = Primitive::from_keyword(expr) {
        return Ok(TypeExpr::Primitive(primitive));
    }
    if expr == "object" {
        return Err(SchemaError::ObjectTypeNotAllowed);
    }

    if let Some(item) = expr.strip_prefix("[]") {
        return Ok(TypeExpr::Array(Box::new(parse_inner(item.trim(), whole)?)));
    }
    if let Some(item) = angle_bracketed(expr, "array<") {
        return Ok(TypeExpr::Array(Box::new(parse_inner(item, whole)?)));
    }
    if let Some(value) = angle_bracketed(expr, "map<") {
        return Ok(TypeExpr::Map(Box::new(parse_inner(value, whole)?)));
    }
    if let Some(rest) = expr.strip_prefix("map[") {
        let Some((key, value)) = rest.split_once(']') else {
            return Err(SchemaError::InvalidMapType {
                expr: expr.to_string(),
            });
        };
        let key = key.trim();
        if key != "string" {
            return Err(SchemaError::NonStringMapKey {
                key: key.to_string(),
                expr: expr.to_string(),
            });
        }
        return Ok(TypeExpr::Map(Box::new(parse_inner(value.trim(), whole)?)));
    }

    Ok(TypeExpr::Named(expr.to_string()))
}

fn angle_bracketed<'a>(expr: &'a str, open: &str) -> Option<&'a str> {
    expr.strip_prefix(open)?.strip_suffix('>').map(str::trim)
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Primitive(p) => f.write_str(p.schema_type().as_str()),
            TypeExpr::Array(item) => write!(f, "[]{item}"),
            TypeExpr::Map(value) => write!(f, "map<{value}>"),
            TypeExpr::Named(name) => f.write_str(name),
        }
    }
}
