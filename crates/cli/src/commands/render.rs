use std::collections::BTreeSet;
use std::path::Path;

use protospec_core::CompilerOptions;
use protospec_interchange::ComponentNode;
use protospec_runtime::{merge_locked_nodes, render_runtime_page, MergeOptions, RenderOptions};

use super::{load_spec, or_exit, print_json};
use crate::OutputFormat;

pub(crate) struct RenderArgs<'a> {
    pub file: &'a Path,
    pub page: &'a str,
    pub previous: Option<&'a Path>,
    pub locked: &'a [String],
}

fn outline(node: &ComponentNode, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(&format!("{} [{}] {}\n", node.type_name(), node.id, node.name));
    for child in &node.children {
        outline(child, depth + 1, out);
    }
}

/// `protospec render`: the runtime view of one page. With `--previous` and
/// `--lock`, locked subtrees of the previous spec's page are merged in
/// first.
pub(crate) fn cmd_render(
    args: RenderArgs<'_>,
    options: &CompilerOptions,
    output: OutputFormat,
    quiet: bool,
) {
    let spec = or_exit(load_spec(args.file, options), output, quiet);
    let page = or_exit(
        spec.page(args.page)
            .cloned()
            .ok_or_else(|| format!("no page '{}' in '{}'", args.page, args.file.display())),
        output,
        quiet,
    );

    let page = match args.previous {
        Some(previous) => {
            let previous_spec = or_exit(load_spec(previous, options), output, quiet);
            let previous_page = or_exit(
                previous_spec.page(args.page).ok_or_else(|| {
                    format!("no page '{}' in '{}'", args.page, previous.display())
                }),
                output,
                quiet,
            );
            let merge = MergeOptions {
                locked_node_ids: args.locked.iter().cloned().collect::<BTreeSet<_>>(),
            };
            merge_locked_nodes(previous_page, &page, &merge)
        }
        None if !args.locked.is_empty() => or_exit(
            Err("--lock needs --previous to take locked nodes from".to_string()),
            output,
            quiet,
        ),
        None => page,
    };

    let rendered = render_runtime_page(&page, &RenderOptions::default());
    match output {
        OutputFormat::Json => print_json(&rendered),
        OutputFormat::Text => {
            let mut text = String::new();
            outline(rendered.root(), 0, &mut text);
            print!("{}", text);
            if !quiet {
                for w in &rendered.warnings {
                    eprintln!("warning[{}]: {} ({})", w.code, w.node_id, w.component_type);
                }
            }
        }
    }
}
