//! Subcommand implementations. Each `cmd_*` prints its own output and exits
//! the process with status 1 on failure.

pub(crate) mod compile;
pub(crate) mod diff;
pub(crate) mod gate;
pub(crate) mod render;
pub(crate) mod tokens;
pub(crate) mod validate;

use std::path::Path;
use std::process;

use protospec_core::{compile_prd_to_proto_spec, CompilerOptions};
use protospec_interchange::{PrdSource, ProtoSpec};

use crate::{report_error, OutputFormat};

/// Project id stamped on specs compiled from the command line.
pub(crate) const LOCAL_PROJECT: &str = "local";

pub(crate) fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("error reading file '{}': {}", path.display(), e))
}

fn is_markdown(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md" | "markdown")
    )
}

/// Load a ProtoSpec from either a PRD (`.md`, compiled on the fly) or a
/// ProtoSpec JSON document.
pub(crate) fn load_spec(path: &Path, options: &CompilerOptions) -> Result<ProtoSpec, String> {
    let content = read_file(path)?;
    if is_markdown(path) {
        compile_prd_to_proto_spec(&PrdSource::markdown(LOCAL_PROJECT, content), options)
            .map(|out| out.spec)
            .map_err(|e| format!("error compiling '{}': {}", path.display(), e))
    } else {
        protospec_interchange::from_json_str(&content)
            .map_err(|e| format!("error loading '{}': {}", path.display(), e))
    }
}

/// Unwrap `result` or report the error and exit.
pub(crate) fn or_exit<T>(result: Result<T, String>, output: OutputFormat, quiet: bool) -> T {
    match result {
        Ok(value) => value,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn print_json(value: &impl serde::Serialize) {
    let pretty = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"serialization error: {}\"}}", e));
    println!("{}", pretty);
}
