use std::path::Path;
use std::process;

use protospec_core::{compile_prd_to_proto_spec, CompileError, CompilerOptions};
use protospec_interchange::PrdSource;

use super::{or_exit, print_json, read_file};
use crate::OutputFormat;

pub(crate) struct CompileArgs<'a> {
    pub file: &'a Path,
    pub project: &'a str,
    pub title: Option<&'a str>,
    pub out: Option<&'a Path>,
}

/// `protospec compile`: PRD in, ProtoSpec JSON out.
///
/// Text mode prints the spec (or writes it to `--out`) and reports warnings
/// and the review summary on stderr. JSON mode prints the whole compile
/// output: spec, warnings and review.
pub(crate) fn cmd_compile(
    args: CompileArgs<'_>,
    options: &CompilerOptions,
    output: OutputFormat,
    quiet: bool,
) {
    let content = or_exit(read_file(args.file), output, quiet);
    let source = PrdSource {
        title: args.title.map(str::to_string),
        ..PrdSource::markdown(args.project, content)
    };

    let compiled = match compile_prd_to_proto_spec(&source, options) {
        Ok(compiled) => compiled,
        Err(CompileError::Prd(e)) => {
            match output {
                OutputFormat::Json => print_json(&serde_json::json!({ "error": e })),
                OutputFormat::Text => {
                    if !quiet {
                        eprintln!("error: {}", e);
                        for (key, value) in &e.details {
                            eprintln!("  {}: {}", key, value);
                        }
                    }
                }
            }
            process::exit(1);
        }
        Err(e) => {
            crate::report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    if let Some(out) = args.out {
        let json = or_exit(
            serde_json::to_string_pretty(&compiled.spec).map_err(|e| e.to_string()),
            output,
            quiet,
        );
        or_exit(
            std::fs::write(out, json + "\n")
                .map_err(|e| format!("error writing '{}': {}", out.display(), e)),
            output,
            quiet,
        );
    }

    match output {
        OutputFormat::Json => print_json(&compiled),
        OutputFormat::Text => {
            if args.out.is_none() {
                print_json(&compiled.spec);
            }
            if !quiet {
                for w in &compiled.warnings {
                    match w.line {
                        Some(line) => eprintln!("warning[{}] line {}: {}", w.code, line, w.message),
                        None => eprintln!("warning[{}]: {}", w.code, w.message),
                    }
                }
                eprintln!(
                    "compiled {} page(s), confidence {:.2}{}",
                    compiled.spec.pages.len(),
                    compiled.review.confidence,
                    if compiled.review.needs_human_review {
                        ", needs human review"
                    } else {
                        ""
                    }
                );
                for reason in &compiled.review.reasons {
                    eprintln!("  - {}", reason);
                }
            }
        }
    }
}
