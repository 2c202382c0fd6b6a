//! Structural schemas
//!
//! A structural schema is the strict subset of a [`SchemaNode`] tree that
//! defaulting works on: every node is typed, every array names its items, and
//! an object either lists its properties or describes its values, never both.
//! Value constraints (bounds, patterns, enums) are dropped; they only matter
//! for validation.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::node::{AdditionalProperties, SchemaNode, SchemaType};

/// A fully typed schema node used for defaulting
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Structural {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Structural>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Structural>>,

    /// Schema of map values; `None` means no additional properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Structural>>,
}

/// Location inside a schema tree, e.g. `properties[db].items`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaPath(Vec<String>);

impl SchemaPath {
    fn join(&self, segment: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.0.push(segment.into());
        path
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        f.write_str(&self.0.join("."))
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StructuralError {
    #[error("{path}.type: type must not be empty")]
    MissingType { path: SchemaPath },

    #[error("{path}.items: items must be specified for arrays")]
    ArrayWithoutItems { path: SchemaPath },

    #[error("{path}: properties and additionalProperties are mutually exclusive")]
    PropertiesWithAdditionalProperties { path: SchemaPath },

    #[error("{path}.additionalProperties: must be false or a schema")]
    AdditionalPropertiesWithoutSchema { path: SchemaPath },
}

/// Lower a JSON Schema tree into a structural schema.
pub fn to_structural(schema: &SchemaNode) -> Result<Structural, StructuralError> {
    lower(schema, &SchemaPath::default())
}

impl TryFrom<&SchemaNode> for Structural {
    type Error = StructuralError;

    fn try_from(schema: &SchemaNode) -> Result<Self, Self::Error> {
        to_structural(schema)
    }
}

fn lower(schema: &SchemaNode, path: &SchemaPath) -> Result<Structural, StructuralError> {
    let Some(schema_type) = schema.schema_type else {
        return Err(StructuralError::MissingType { path: path.clone() });
    };

    let items = match (&schema.items, schema_type) {
        (Some(items), _) => Some(Box::new(lower(items, &path.join("items"))?)),
        (None, SchemaType::Array) => {
            return Err(StructuralError::ArrayWithoutItems { path: path.clone() });
        }
        (None, _) => None,
    };

    let mut properties = IndexMap::new();
    if let Some(props) = &schema.properties {
        for (name, prop) in props {
            let prop_path = path.join(format!("properties[{name}]"));
            properties.insert(name.clone(), lower(prop, &prop_path)?);
        }
    }

    let additional_properties = match &schema.additional_properties {
        None | Some(AdditionalProperties::Bool(false)) => None,
        Some(AdditionalProperties::Bool(true)) => {
            return Err(StructuralError::AdditionalPropertiesWithoutSchema { path: path.clone() });
        }
        Some(AdditionalProperties::Schema(values)) => {
            if !properties.is_empty() {
                return Err(StructuralError::PropertiesWithAdditionalProperties {
                    path: path.clone(),
                });
            }
            Some(Box::new(lower(values, &path.join("additionalProperties"))?))
        }
    };

    Ok(Structural {
        schema_type,
        title: schema.title.clone(),
        description: schema.description.clone(),
        format: schema.format.clone(),
        default: schema.default.clone(),
        properties,
        items,
        additional_properties,
    })
}
