//! Shared argument definitions.

use choreo_schema::Config;

use crate::util::OutputFormat;

/// Extraction options.
///
/// Can be embedded in other command Args using `#[command(flatten)]`.
#[derive(clap::Args, Clone, Default)]
pub struct ConfigArgs {
    /// Close every object built from a field map with `additionalProperties: false`
    #[arg(long)]
    pub additional_properties_false: bool,

    /// Do not check `default` and `$default` values against their schema
    #[arg(long)]
    pub skip_default_validation: bool,

    /// Ignore unknown constraint markers instead of failing
    #[arg(long)]
    pub allow_unknown_markers: bool,

    /// Additional marker prefix to ignore (repeatable; `oc:` is always ignored)
    #[arg(long = "marker-prefix", value_name = "PREFIX")]
    pub marker_prefixes: Vec<String>,
}

impl ConfigArgs {
    /// Build the extraction Config from command-line arguments.
    pub fn to_config(&self) -> Config {
        let mut config = Config {
            additional_properties_false: self.additional_properties_false,
            skip_default_validation: self.skip_default_validation,
            allow_unknown_markers: self.allow_unknown_markers,
            ..Default::default()
        };
        config
            .allowed_marker_prefixes
            .extend(self.marker_prefixes.iter().cloned());
        config
    }
}

/// Output-related command-line arguments.
#[derive(clap::Args, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Pretty print JSON output
    #[arg(short, long)]
    pub pretty: bool,
}
