//! Schema definitions
//!
//! A [`Definition`] bundles a custom type table with an ordered list of field
//! maps (for example parameters followed by environment overrides). The maps
//! are deep-merged before extraction; later maps win per key, and nested maps
//! merge recursively.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::FieldMap;
use crate::config::Config;
use crate::error::SchemaError;
use crate::extractor::extract_schema_with_config;
use crate::node::SchemaNode;
use crate::structural::{Structural, to_structural};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    /// Named custom types: shorthand strings or field maps
    #[serde(default)]
    pub types: FieldMap,
    /// Field maps merged in order
    #[serde(default)]
    pub schemas: Vec<FieldMap>,
}

impl Definition {
    pub fn new(types: FieldMap, schemas: Vec<FieldMap>) -> Self {
        Self { types, schemas }
    }

    /// Merge all field maps and extract the resulting object schema.
    pub fn to_json_schema(&self) -> Result<SchemaNode, SchemaError> {
        self.to_json_schema_with_config(&Config::default())
    }

    pub fn to_json_schema_with_config(&self, config: &Config) -> Result<SchemaNode, SchemaError> {
        let merged = merge_field_maps(&self.schemas);
        if merged.is_empty() {
            return Ok(SchemaNode::object(IndexMap::new()));
        }
        debug!(
            fields = merged.len(),
            types = self.types.len(),
            "extracting schema from merged field maps"
        );

        let mut schema = extract_schema_with_config(&merged, &self.types, config)?;
        schema.sort_required_fields();
        Ok(schema)
    }

    /// Extract the JSON Schema and lower it to a structural schema.
    pub fn to_structural(&self) -> Result<Structural, SchemaError> {
        self.to_structural_with_config(&Config::default())
    }

    pub fn to_structural_with_config(&self, config: &Config) -> Result<Structural, SchemaError> {
        let schema = self.to_json_schema_with_config(config)?;
        Ok(to_structural(&schema)?)
    }
}

/// Deep-merge `maps` in order into a new map.
///
/// When both sides hold a map the two are merged recursively; otherwise the
/// later value replaces the earlier one. Inputs are never modified.
pub fn merge_field_maps(maps: &[FieldMap]) -> FieldMap {
    let mut merged = FieldMap::new();
    for map in maps {
        merge_into(&mut merged, map);
    }
    merged
}

fn merge_into(target: &mut FieldMap, source: &FieldMap) {
    for (key, value) in source {
        if let Value::Object(incoming) = value
            && let Some(Value::Object(existing)) = target.get_mut(key)
        {
            merge_into(existing, incoming);
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}
