//! Convert command - prints the JSON Schema of a schema definition.

use anyhow::Context;

use crate::args::{ConfigArgs, OutputArgs};
use crate::util::{display_path, load_definition, render};

#[derive(clap::Args)]
pub struct Args {
    /// Path to the schema definition (use '-' or omit for stdin)
    pub file: Option<String>,

    /// Print the structural schema used for defaulting instead
    #[arg(long)]
    pub structural: bool,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let file = args.file.as_deref();
    let definition = load_definition(file)?;
    let config = args.config.to_config();
    let path = display_path(file);

    let rendered = if args.structural {
        let structural = definition
            .to_structural_with_config(&config)
            .with_context(|| format!("{path}: invalid schema definition"))?;
        render(&structural, args.output.format, args.output.pretty)?
    } else {
        let schema = definition
            .to_json_schema_with_config(&config)
            .with_context(|| format!("{path}: invalid schema definition"))?;
        render(&schema, args.output.format, args.output.pretty)?
    };

    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}
