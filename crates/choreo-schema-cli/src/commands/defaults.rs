//! Defaults command - prints values with schema defaults applied.
//!
//! Without a values file, prints the fully defaulted value for an empty input.

use anyhow::Context;
use choreo_schema::{apply_defaults, default_skeleton};

use crate::args::{ConfigArgs, OutputArgs};
use crate::util::{display_path, load_definition, load_values, render};

#[derive(clap::Args)]
pub struct Args {
    /// Path to the schema definition (use '-' for stdin)
    pub definition: String,

    /// Values file to default
    #[arg(long)]
    pub values: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let definition = load_definition(Some(&args.definition))?;
    let structural = definition
        .to_structural_with_config(&args.config.to_config())
        .with_context(|| {
            format!(
                "{}: invalid schema definition",
                display_path(Some(&args.definition))
            )
        })?;

    let defaulted = match args.values.as_deref() {
        Some(values) => {
            let target = load_values(Some(values))?;
            apply_defaults(Some(target), Some(&structural))
        }
        None => default_skeleton(&structural),
    };

    let rendered = render(&defaulted, args.output.format, args.output.pretty)?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}
