//! Constraint markers
//!
//! Applies the `key=value` tokens of a shorthand's constraint expression to a
//! schema node. The `required` marker is rejected outright: a field is
//! optional exactly when it has a `default`.

use serde_json::{Number, Value};
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{SchemaError, ValueError};
use crate::node::SchemaNode;
use crate::tokenize::{split_respecting_quotes, tokenize_constraints, unquote_if_needed};
use crate::validate::validate;
use crate::value::{parse_arbitrary_value, parse_bool, parse_number, parse_value_for_type};

/// Supported constraint keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Default,
    Enum,
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
    MinItems,
    MaxItems,
    UniqueItems,
    MinLength,
    MaxLength,
    MinProperties,
    MaxProperties,
    MultipleOf,
    Example,
    Pattern,
    Title,
    Description,
    Format,
}

impl Marker {
    pub fn from_key(key: &str) -> Option<Self> {
        let marker = match key {
            "default" => Marker::Default,
            "enum" => Marker::Enum,
            "minimum" => Marker::Minimum,
            "maximum" => Marker::Maximum,
            "exclusiveMinimum" => Marker::ExclusiveMinimum,
            "exclusiveMaximum" => Marker::ExclusiveMaximum,
            "minItems" => Marker::MinItems,
            "maxItems" => Marker::MaxItems,
            "uniqueItems" => Marker::UniqueItems,
            "minLength" => Marker::MinLength,
            "maxLength" => Marker::MaxLength,
            "minProperties" => Marker::MinProperties,
            "maxProperties" => Marker::MaxProperties,
            "multipleOf" => Marker::MultipleOf,
            "example" => Marker::Example,
            "pattern" => Marker::Pattern,
            "title" => Marker::Title,
            "description" => Marker::Description,
            "format" => Marker::Format,
            _ => return None,
        };
        Some(marker)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Marker::Default => "default",
            Marker::Enum => "enum",
            Marker::Minimum => "minimum",
            Marker::Maximum => "maximum",
            Marker::ExclusiveMinimum => "exclusiveMinimum",
            Marker::ExclusiveMaximum => "exclusiveMaximum",
            Marker::MinItems => "minItems",
            Marker::MaxItems => "maxItems",
            Marker::UniqueItems => "uniqueItems",
            Marker::MinLength => "minLength",
            Marker::MaxLength => "maxLength",
            Marker::MinProperties => "minProperties",
            Marker::MaxProperties => "maxProperties",
            Marker::MultipleOf => "multipleOf",
            Marker::Example => "example",
            Marker::Pattern => "pattern",
            Marker::Title => "title",
            Marker::Description => "description",
            Marker::Format => "format",
        }
    }
}

/// Parse `constraint_expr` and apply every marker to `schema` in place.
///
/// The field's own type (already set on `schema`) decides how `default` and
/// `enum` values are parsed. Once all markers are applied, a `default` is
/// checked against the fully constrained schema unless the config skips it.
pub fn apply_constraints(
    schema: &mut SchemaNode,
    constraint_expr: &str,
    config: &Config,
) -> Result<(), SchemaError> {
    if constraint_expr.trim().is_empty() {
        return Ok(());
    }

    for token in tokenize_constraints(constraint_expr) {
        let Some((key, value)) = token.split_once('=') else {
            let marker = token.trim();
            if marker == "|" || config.has_allowed_prefix(marker) {
                continue;
            }
            return Err(SchemaError::MissingMarkerValue {
                marker: marker.to_string(),
            });
        };
        let key = key.trim();
        let value = value.trim();

        if key == "required" {
            return Err(SchemaError::RequiredMarkerNotAllowed);
        }

        match Marker::from_key(key) {
            Some(marker) => {
                trace!(marker = marker.as_str(), value, "applying constraint");
                apply_marker(schema, marker, value)?;
            }
            None if config.has_allowed_prefix(key) => {}
            None if config.allow_unknown_markers => {
                debug!(marker = key, "ignoring unknown constraint marker");
            }
            None => {
                return Err(SchemaError::UnknownMarker {
                    marker: key.to_string(),
                });
            }
        }
    }

    if !config.skip_default_validation
        && let Some(default) = &schema.default
    {
        validate(schema, default).map_err(SchemaError::InvalidDefault)?;
    }

    Ok(())
}

fn apply_marker(schema: &mut SchemaNode, marker: Marker, value: &str) -> Result<(), SchemaError> {
    let invalid = |source: ValueError| SchemaError::InvalidConstraintValue {
        marker: marker.as_str(),
        value: value.to_string(),
        source,
    };

    match marker {
        Marker::Default => {
            let parsed = parse_value_for_type(value, schema.schema_type).map_err(invalid)?;
            schema.default = Some(parsed);
        }
        Marker::Enum => {
            schema.enum_values = Some(parse_enum(value, schema)?);
        }
        Marker::Minimum => schema.minimum = Some(parse_number(value).map_err(invalid)?),
        Marker::Maximum => schema.maximum = Some(parse_number(value).map_err(invalid)?),
        Marker::MultipleOf => schema.multiple_of = Some(parse_multiple_of(value).map_err(invalid)?),
        Marker::ExclusiveMinimum => {
            schema.exclusive_minimum = parse_bool(value).map_err(invalid)?;
        }
        Marker::ExclusiveMaximum => {
            schema.exclusive_maximum = parse_bool(value).map_err(invalid)?;
        }
        Marker::UniqueItems => schema.unique_items = parse_bool(value).map_err(invalid)?,
        Marker::MinItems => schema.min_items = Some(parse_count(value).map_err(invalid)?),
        Marker::MaxItems => schema.max_items = Some(parse_count(value).map_err(invalid)?),
        Marker::MinLength => schema.min_length = Some(parse_count(value).map_err(invalid)?),
        Marker::MaxLength => schema.max_length = Some(parse_count(value).map_err(invalid)?),
        Marker::MinProperties => {
            schema.min_properties = Some(parse_count(value).map_err(invalid)?);
        }
        Marker::MaxProperties => {
            schema.max_properties = Some(parse_count(value).map_err(invalid)?);
        }
        Marker::Example => schema.example = Some(parse_arbitrary_value(value).map_err(invalid)?),
        Marker::Pattern => schema.pattern = Some(unquote_if_needed(value)),
        Marker::Title => schema.title = Some(unquote_if_needed(value)),
        Marker::Description => schema.description = Some(unquote_if_needed(value)),
        Marker::Format => schema.format = Some(unquote_if_needed(value)),
    }
    Ok(())
}

fn parse_enum(value: &str, schema: &SchemaNode) -> Result<Vec<Value>, SchemaError> {
    let items = split_respecting_quotes(value, ',');
    if items.is_empty() {
        return Err(SchemaError::EmptyEnum {
            value: value.to_string(),
        });
    }
    items
        .into_iter()
        .map(|item| {
            parse_value_for_type(&item, schema.schema_type)
                .map_err(|source| SchemaError::InvalidEnumValue { value: item, source })
        })
        .collect()
}

fn parse_multiple_of(value: &str) -> Result<Number, ValueError> {
    let divisor = parse_number(value)?;
    if divisor.as_f64().is_some_and(|d| d > 0.0) {
        Ok(divisor)
    } else {
        Err(ValueError::NotPositive(value.to_string()))
    }
}

fn parse_count(value: &str) -> Result<u64, ValueError> {
    Ok(value.parse::<u64>()?)
}
