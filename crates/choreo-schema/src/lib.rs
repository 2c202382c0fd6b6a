#![doc = include_str!("../README.md")]

mod config;
mod constraints;
mod defaulting;
mod definition;
mod error;
mod extractor;
mod node;
mod structural;
pub mod tokenize;
pub mod type_expr;
pub mod validate;
pub mod value;

pub use config::Config;
pub use constraints::{Marker, apply_constraints};
pub use defaulting::{apply_defaults, default_skeleton, default_value};
pub use definition::{Definition, merge_field_maps};
pub use error::{ObjectDefaultError, SchemaError, ValueError};
pub use extractor::{OBJECT_DEFAULT_KEY, extract_schema, extract_schema_with_config};
pub use node::{AdditionalProperties, SchemaNode, SchemaType};
pub use structural::{SchemaPath, Structural, StructuralError, to_structural};
pub use validate::{ValidationError, ValidationErrors, validate};

/// A shorthand field map: field names to shorthand strings or nested maps
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// Result type for choreo-schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;
