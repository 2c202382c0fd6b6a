use clap::{ArgAction, Parser, Subcommand};
use tracing::level_filters::LevelFilter;

mod args;
mod commands;
mod util;

#[derive(Parser)]
#[command(
    name = "choreo-schema",
    version,
    about = "Convert, default and check OpenChoreo shorthand schemas"
)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a schema definition to JSON Schema
    Convert(commands::convert::Args),
    /// Print the defaulted values for a schema definition
    Defaults(commands::defaults::Args),
    /// Validate a values file against a schema definition
    Check(commands::check::Args),
}

fn init_log(verbose: u8) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_log(cli.verbose);

    match cli.command {
        Commands::Convert(args) => commands::convert::run(args),
        Commands::Defaults(args) => commands::defaults::run(args),
        Commands::Check(args) => commands::check::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::OutputFormat;

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from([
            "choreo-schema",
            "convert",
            "component.yaml",
            "--structural",
            "--format",
            "yaml",
            "--additional-properties-false",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 0);
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.file.as_deref(), Some("component.yaml"));
        assert!(args.structural);
        assert!(matches!(args.output.format, OutputFormat::Yaml));
        let config = args.config.to_config();
        assert!(config.additional_properties_false);
        assert!(!config.skip_default_validation);
        assert_eq!(config.allowed_marker_prefixes, vec!["oc:".to_string()]);
    }

    #[test]
    fn test_parse_convert_from_stdin() {
        let cli = Cli::try_parse_from(["choreo-schema", "-vv", "convert"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert!(args.file.is_none());
        assert!(matches!(args.output.format, OutputFormat::Json));
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from([
            "choreo-schema",
            "defaults",
            "component.yaml",
            "--values",
            "values.yaml",
            "--allow-unknown-markers",
            "--marker-prefix",
            "x-",
        ])
        .unwrap();
        let Commands::Defaults(args) = cli.command else {
            panic!("expected defaults");
        };
        assert_eq!(args.definition, "component.yaml");
        assert_eq!(args.values.as_deref(), Some("values.yaml"));
        let config = args.config.to_config();
        assert!(config.allow_unknown_markers);
        assert_eq!(
            config.allowed_marker_prefixes,
            vec!["oc:".to_string(), "x-".to_string()]
        );
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from([
            "choreo-schema",
            "check",
            "component.yaml",
            "values.yaml",
            "--no-defaults",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.definition, "component.yaml");
        assert_eq!(args.values, "values.yaml");
        assert!(args.no_defaults);
    }

    #[test]
    fn test_check_requires_values() {
        assert!(Cli::try_parse_from(["choreo-schema", "check", "component.yaml"]).is_err());
    }
}
