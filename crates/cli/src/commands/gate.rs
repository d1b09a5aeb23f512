use std::path::Path;
use std::process;
use std::time::Duration;

use protospec_analyze::{run_quality_gate, GateOptions};
use protospec_core::CompilerOptions;

use super::{load_spec, or_exit, print_json};
use crate::OutputFormat;

/// `protospec gate`: run the quality gate; exit 1 when it fails.
pub(crate) fn cmd_gate(
    file: &Path,
    options: &CompilerOptions,
    step_delay: Duration,
    output: OutputFormat,
    quiet: bool,
) {
    let spec = or_exit(load_spec(file, options), output, quiet);
    let runtime = or_exit(
        tokio::runtime::Runtime::new().map_err(|e| format!("failed to create tokio runtime: {}", e)),
        output,
        quiet,
    );
    let gate_options = GateOptions {
        replay_step_delay: step_delay,
        ..GateOptions::default()
    };
    let report = runtime.block_on(run_quality_gate(&spec, &gate_options));

    match output {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            if !quiet || !report.passed {
                println!("{}", report);
            }
        }
    }
    if !report.passed {
        process::exit(1);
    }
}
