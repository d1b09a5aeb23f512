use std::path::Path;
use std::process;

use protospec_core::validate_proto_spec;

use super::{or_exit, read_file};
use crate::{report_error, OutputFormat};

static PROTOSPEC_SCHEMA_STR: &str = include_str!("../../../../schema/protospec-schema.json");

/// `protospec validate`: JSON Schema check of the wire form, then the
/// structural validator on the typed document.
pub(crate) fn cmd_validate(spec_path: &Path, output: OutputFormat, quiet: bool) {
    let schema: serde_json::Value = match serde_json::from_str(PROTOSPEC_SCHEMA_STR) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("internal error: failed to parse embedded schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("internal error: failed to compile schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc_str = or_exit(read_file(spec_path), output, quiet);
    let doc: serde_json::Value = or_exit(
        serde_json::from_str(&doc_str)
            .map_err(|e| format!("error parsing JSON in '{}': {}", spec_path.display(), e)),
        output,
        quiet,
    );

    let mut errors: Vec<String> = validator
        .iter_errors(&doc)
        .map(|e| format!("schema: {}", e))
        .collect();

    // The structural pass needs a document that at least loads.
    if errors.is_empty() {
        match protospec_interchange::from_json(&doc) {
            Ok(spec) => errors.extend(
                validate_proto_spec(&spec)
                    .issues
                    .into_iter()
                    .map(|i| format!("{} at {}: {}", i.code, i.path, i.message)),
            ),
            Err(e) => errors.push(format!("load: {}", e)),
        }
    }

    if errors.is_empty() {
        if !quiet {
            match output {
                OutputFormat::Text => println!("valid"),
                OutputFormat::Json => println!("{{\"valid\": true}}"),
            }
        }
        return;
    }

    match output {
        OutputFormat::Text => {
            if !quiet {
                eprintln!("invalid spec");
                for err in &errors {
                    eprintln!("  - {}", err);
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({ "valid": false, "errors": errors });
            println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
    }
    process::exit(1);
}
