use std::fs;
use std::io::{self, Read};

use anyhow::Context;
use choreo_schema::{Definition, FieldMap};
use clap::ValueEnum;
use serde::Serialize;

/// Read input from file path or stdin.
/// - `None` or `Some("-")` reads from stdin
/// - `Some(path)` reads from file
pub fn read_input(file: Option<&str>) -> anyhow::Result<String> {
    match file {
        None | Some("-") => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Error reading from stdin")?;
            Ok(buffer)
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("Error reading {path}")),
    }
}

/// Helper to get display path for error messages
pub fn display_path(file: Option<&str>) -> &str {
    match file {
        None | Some("-") => "<stdin>",
        Some(path) => path,
    }
}

/// Parse a schema definition. JSON input is accepted as YAML.
pub fn parse_definition(contents: &str, path: &str) -> anyhow::Result<Definition> {
    serde_yaml::from_str(contents).with_context(|| format!("{path}: invalid schema definition"))
}

/// Parse a values document; an empty document is an empty object.
pub fn parse_values(contents: &str, path: &str) -> anyhow::Result<FieldMap> {
    if contents.trim().is_empty() {
        return Ok(FieldMap::new());
    }
    serde_yaml::from_str(contents).with_context(|| format!("{path}: values must be an object"))
}

pub fn load_definition(file: Option<&str>) -> anyhow::Result<Definition> {
    let contents = read_input(file)?;
    let definition = parse_definition(&contents, display_path(file))?;
    tracing::debug!(
        path = display_path(file),
        types = definition.types.len(),
        schemas = definition.schemas.len(),
        "loaded schema definition"
    );
    Ok(definition)
}

pub fn load_values(file: Option<&str>) -> anyhow::Result<FieldMap> {
    let contents = read_input(file)?;
    parse_values(&contents, display_path(file))
}

/// Output format for converted documents
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    Json,
    Yaml,
}

pub fn render<T: Serialize>(value: &T, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    let rendered = match format {
        OutputFormat::Json if pretty => serde_json::to_string_pretty(value)?,
        OutputFormat::Json => serde_json::to_string(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    Ok(rendered)
}
