//! Check command - validates a values file against a schema definition.
//!
//! Defaults are applied before validation, as at admission time.

use anyhow::{Context, bail};
use choreo_schema::{Config, Definition, FieldMap, apply_defaults, to_structural, validate};
use serde_json::Value;

use crate::args::ConfigArgs;
use crate::util::{display_path, load_definition, load_values};

#[derive(clap::Args)]
pub struct Args {
    /// Path to the schema definition
    pub definition: String,

    /// Path to the values file to validate (use '-' for stdin)
    pub values: String,

    /// Validate the values as given, without applying defaults
    #[arg(long)]
    pub no_defaults: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let definition = load_definition(Some(&args.definition))?;
    let values = load_values(Some(&args.values))?;
    let path = display_path(Some(&args.values));

    check_values(
        &definition,
        values,
        &args.config.to_config(),
        !args.no_defaults,
    )
    .with_context(|| format!("{path}: check failed"))?;
    println!("{path}: valid");
    Ok(())
}

/// Validate `values` against the schema built from `definition`.
///
/// Every violation is printed to stderr; any violation makes the result an
/// error, so the process exits non-zero.
pub fn check_values(
    definition: &Definition,
    mut values: FieldMap,
    config: &Config,
    with_defaults: bool,
) -> anyhow::Result<()> {
    let schema = definition
        .to_json_schema_with_config(config)
        .context("invalid schema definition")?;

    if with_defaults {
        let structural = to_structural(&schema).context("invalid structural schema")?;
        values = apply_defaults(Some(values), Some(&structural));
    }

    if let Err(errors) = validate(&schema, &Value::Object(values)) {
        for error in &errors {
            eprintln!("{error}");
        }
        bail!("{} violation(s)", errors.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{parse_definition, parse_values};

    const COMPONENT: &str = r#"
schemas:
  - image: string
    replicas: 'integer | minimum=1 default=1'
    resources:
      cpu: 'string | default=100m'
"#;

    fn check(values: &str, with_defaults: bool) -> anyhow::Result<()> {
        let definition = parse_definition(COMPONENT, "component.yaml").unwrap();
        let values = parse_values(values, "values.yaml").unwrap();
        check_values(&definition, values, &Config::default(), with_defaults)
    }

    #[test]
    fn test_defaults_applied_before_validation() {
        check("image: nginx\nresources: {}\n", true).unwrap();
    }

    #[test]
    fn test_null_is_only_replaced_with_defaults() {
        let values = "image: nginx\nreplicas: null\nresources: {}\n";
        check(values, true).unwrap();
        let err = check(values, false).unwrap_err();
        assert_eq!(err.to_string(), "1 violation(s)");
    }

    #[test]
    fn test_violations_are_errors() {
        let err = check("replicas: 0\n", true).unwrap_err();
        assert_eq!(err.to_string(), "3 violation(s)");
    }

    #[test]
    fn test_invalid_definition() {
        let definition = parse_definition("schemas:\n  - f: Unknown\n", "bad.yaml").unwrap();
        let err = check_values(&definition, FieldMap::new(), &Config::default(), true).unwrap_err();
        assert_eq!(err.to_string(), "invalid schema definition");
    }
}
