use std::path::Path;

use protospec_interchange::{to_css_variables, DesignTokens, ThemeVariant};

use super::{or_exit, print_json, read_file};
use crate::OutputFormat;

/// `protospec tokens`: the design tokens as CSS custom properties (text) or
/// JSON.
pub(crate) fn cmd_tokens(dark: bool, overrides: Option<&Path>, output: OutputFormat, quiet: bool) {
    let variant = if dark {
        ThemeVariant::Dark
    } else {
        ThemeVariant::Light
    };
    let mut tokens = DesignTokens::for_variant(variant);
    if let Some(path) = overrides {
        let content = or_exit(read_file(path), output, quiet);
        let value: serde_json::Value = or_exit(
            serde_json::from_str(&content)
                .map_err(|e| format!("error parsing JSON in '{}': {}", path.display(), e)),
            output,
            quiet,
        );
        if !value.is_object() {
            or_exit::<()>(
                Err(format!("overrides in '{}' must be a JSON object", path.display())),
                output,
                quiet,
            );
        }
        tokens = tokens.with_overrides(&value);
    }

    match output {
        OutputFormat::Json => print_json(&tokens),
        OutputFormat::Text => println!("{}", to_css_variables(&tokens)),
    }
}
