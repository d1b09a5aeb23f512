use std::path::Path;

use protospec_analyze::compute_spec_diff;
use protospec_core::CompilerOptions;

use super::{load_spec, or_exit, print_json};
use crate::OutputFormat;

/// `protospec diff`: id-keyed changes from `a` to `b`. Either side may be a
/// PRD or a ProtoSpec JSON document. Exits 0 whether or not there are
/// changes.
pub(crate) fn cmd_diff(
    a: &Path,
    b: &Path,
    options: &CompilerOptions,
    output: OutputFormat,
    quiet: bool,
) {
    let before = or_exit(load_spec(a, options), output, quiet);
    let after = or_exit(load_spec(b, options), output, quiet);
    let diff = compute_spec_diff(&before, &after);

    match output {
        OutputFormat::Json => print_json(&diff),
        OutputFormat::Text => {
            print!("{}", diff.to_text());
            if !quiet && diff.has_changes() {
                let s = &diff.summary;
                eprintln!(
                    "interactions: +{} -{} ~{}; nodes: +{} -{} ~{}",
                    s.interactions_added,
                    s.interactions_removed,
                    s.interactions_modified,
                    s.nodes_added,
                    s.nodes_removed,
                    s.nodes_modified
                );
            }
        }
    }
}
