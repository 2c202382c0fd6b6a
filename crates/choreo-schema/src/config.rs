/// Configuration for schema extraction
///
/// Callers with different strictness needs (admission webhooks vs. read-only
/// schema display) pass their own `Config` instead of sharing global state.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Emit `additionalProperties: false` on every object built from a field map
    pub additional_properties_false: bool,
    /// Do not check `default` and `$default` values against their schema
    pub skip_default_validation: bool,
    /// Ignore unknown constraint markers instead of rejecting them
    pub allow_unknown_markers: bool,
    /// Marker prefixes that are always ignored (reserved for external annotations)
    pub allowed_marker_prefixes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            additional_properties_false: false,
            skip_default_validation: false,
            allow_unknown_markers: false,
            allowed_marker_prefixes: vec!["oc:".to_string()],
        }
    }
}

impl Config {
    pub(crate) fn has_allowed_prefix(&self, marker: &str) -> bool {
        self.allowed_marker_prefixes
            .iter()
            .any(|prefix| marker.starts_with(prefix.as_str()))
    }
}
