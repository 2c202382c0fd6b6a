//! OpenAPI v3 schema tree produced by the extractor
//!
//! The layout mirrors the Kubernetes `JSONSchemaProps` subset that shorthand
//! schemas can express. Field declaration order is the serialization order, so
//! two equal trees always serialize to identical bytes.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// The `type` keyword of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

impl SchemaType {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Additional properties policy
///
/// Map types carry a value schema; `Config::additional_properties_false`
/// closes structured objects with `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaNode>),
}

impl AdditionalProperties {
    pub fn schema(&self) -> Option<&SchemaNode> {
        match self {
            AdditionalProperties::Schema(schema) => Some(schema),
            AdditionalProperties::Bool(_) => None,
        }
    }

    fn schema_mut(&mut self) -> Option<&mut SchemaNode> {
        match self {
            AdditionalProperties::Schema(schema) => Some(schema),
            AdditionalProperties::Bool(_) => None,
        }
    }
}

/// A single node of the generated schema tree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub exclusive_maximum: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub exclusive_minimum: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub unique_items: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaNode>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl SchemaNode {
    /// Leaf node carrying only a type
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Default::default()
        }
    }

    /// Object node with the given properties
    pub fn object(properties: IndexMap<String, SchemaNode>) -> Self {
        Self {
            schema_type: Some(SchemaType::Object),
            properties: Some(properties),
            ..Default::default()
        }
    }

    /// Array node whose elements follow `items`
    pub fn array(items: SchemaNode) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    /// Free-form object whose values follow `values`
    pub fn map(values: SchemaNode) -> Self {
        Self {
            schema_type: Some(SchemaType::Object),
            additional_properties: Some(AdditionalProperties::Schema(Box::new(values))),
            ..Default::default()
        }
    }

    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.as_ref()?.get(name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Sort every `required` list in this subtree.
    ///
    /// Visits properties, array items and additional properties schemas.
    pub fn sort_required_fields(&mut self) {
        self.required.sort();
        if let Some(properties) = &mut self.properties {
            for prop in properties.values_mut() {
                prop.sort_required_fields();
            }
        }
        if let Some(items) = &mut self.items {
            items.sort_required_fields();
        }
        if let Some(additional) = self
            .additional_properties
            .as_mut()
            .and_then(AdditionalProperties::schema_mut)
        {
            additional.sort_required_fields();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leaf_serializes_type_only() {
        let node = SchemaNode::of_type(SchemaType::Integer);
        assert_eq!(serde_json::to_value(&node).unwrap(), json!({"type": "integer"}));
    }

    #[test]
    fn test_serialization_key_order() {
        let mut node = SchemaNode::of_type(SchemaType::String);
        node.enum_values = Some(vec![json!("a"), json!("b")]);
        node.default = Some(json!("a"));
        node.description = Some("level".to_string());
        let text = serde_json::to_string(&node).unwrap();
        assert_eq!(
            text,
            r#"{"description":"level","type":"string","default":"a","enum":["a","b"]}"#
        );
    }

    #[test]
    fn test_false_flags_are_omitted() {
        let mut node = SchemaNode::of_type(SchemaType::Number);
        node.minimum = Some(Number::from(1));
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value, json!({"type": "number", "minimum": 1}));

        node.exclusive_minimum = true;
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({"type": "number", "minimum": 1, "exclusiveMinimum": true})
        );
    }

    #[test]
    fn test_map_node_shape() {
        let node = SchemaNode::map(SchemaNode::of_type(SchemaType::String));
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"type": "object", "additionalProperties": {"type": "string"}})
        );
    }

    #[test]
    fn test_additional_properties_bool_roundtrip() {
        let json = r#"{"type":"object","additionalProperties":false}"#;
        let node: SchemaNode = serde_json::from_str(json).unwrap();
        assert_eq!(
            node.additional_properties,
            Some(AdditionalProperties::Bool(false))
        );
        assert_eq!(serde_json::to_string(&node).unwrap(), json);
    }

    #[test]
    fn test_sort_required_fields_recurses() {
        let mut inner = SchemaNode::object(IndexMap::new());
        inner.required = vec!["z".to_string(), "a".to_string()];

        let mut value_schema = SchemaNode::object(IndexMap::new());
        value_schema.required = vec!["y".to_string(), "b".to_string()];

        let mut properties = IndexMap::new();
        properties.insert("list".to_string(), SchemaNode::array(inner));
        properties.insert("lookup".to_string(), SchemaNode::map(value_schema));

        let mut root = SchemaNode::object(properties);
        root.required = vec!["lookup".to_string(), "list".to_string()];
        root.sort_required_fields();

        assert_eq!(root.required, vec!["list", "lookup"]);
        let list = root.property("list").unwrap();
        assert_eq!(list.items.as_ref().unwrap().required, vec!["a", "z"]);
        let lookup = root.property("lookup").unwrap();
        let values = lookup
            .additional_properties
            .as_ref()
            .and_then(AdditionalProperties::schema)
            .unwrap();
        assert_eq!(values.required, vec!["b", "y"]);
    }
}
