mod commands;
mod config;
mod serve;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::commands::compile::CompileArgs;
use crate::commands::render::RenderArgs;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// PRD-to-ProtoSpec compiler and verification toolchain.
#[derive(Parser)]
#[command(
    name = "protospec",
    version,
    about = "PRD-to-ProtoSpec compiler and verification toolchain"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Path to a protospec.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a markdown PRD to ProtoSpec JSON
    Compile {
        /// Path to the PRD markdown file
        file: PathBuf,
        /// Project id stamped into the spec metadata
        #[arg(long, default_value = commands::LOCAL_PROJECT)]
        project: String,
        /// Title used when the PRD has no '#' heading
        #[arg(long)]
        title: Option<String>,
        /// Write the spec to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Validate ProtoSpec JSON against the schema and structural rules
    Validate {
        /// Path to the ProtoSpec JSON file
        spec: PathBuf,
    },

    /// Diff two specs (PRD markdown or ProtoSpec JSON) by stable id
    Diff {
        /// The earlier version
        a: PathBuf,
        /// The later version
        b: PathBuf,
    },

    /// Run the quality gate (schema, traceability, interaction replay)
    Gate {
        /// PRD markdown or ProtoSpec JSON
        file: PathBuf,
    },

    /// Render one page for the runtime whitelist
    Render {
        /// PRD markdown or ProtoSpec JSON
        file: PathBuf,
        /// Page id to render
        #[arg(long)]
        page: String,
        /// Earlier version of the spec to take locked nodes from
        #[arg(long)]
        previous: Option<PathBuf>,
        /// Comma-separated node ids to keep from --previous
        #[arg(long, value_delimiter = ',')]
        lock: Vec<String>,
    },

    /// Print design tokens as CSS variables
    Tokens {
        /// Use the dark theme
        #[arg(long)]
        dark: bool,
        /// JSON file with token overrides
        #[arg(long)]
        overrides: Option<PathBuf>,
    },

    /// Start the HTTP job API server
    Serve {
        /// Port to listen on (default from config, then 8080)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "error" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let config = commands::or_exit(config::load(cli.config.as_deref()), cli.output, cli.quiet);
    let compiler = config.compiler_options();

    match cli.command {
        Commands::Compile {
            file,
            project,
            title,
            out,
        } => {
            commands::compile::cmd_compile(
                CompileArgs {
                    file: &file,
                    project: &project,
                    title: title.as_deref(),
                    out: out.as_deref(),
                },
                &compiler,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Validate { spec } => {
            commands::validate::cmd_validate(&spec, cli.output, cli.quiet);
        }
        Commands::Diff { a, b } => {
            commands::diff::cmd_diff(&a, &b, &compiler, cli.output, cli.quiet);
        }
        Commands::Gate { file } => {
            commands::gate::cmd_gate(&file, &compiler, config.step_delay(), cli.output, cli.quiet);
        }
        Commands::Render {
            file,
            page,
            previous,
            lock,
        } => {
            commands::render::cmd_render(
                RenderArgs {
                    file: &file,
                    page: &page,
                    previous: previous.as_deref(),
                    locked: &lock,
                },
                &compiler,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Tokens { dark, overrides } => {
            commands::tokens::cmd_tokens(dark, overrides.as_deref(), cli.output, cli.quiet);
        }
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            let rt = commands::or_exit(
                tokio::runtime::Runtime::new()
                    .map_err(|e| format!("failed to create tokio runtime: {}", e)),
                cli.output,
                cli.quiet,
            );
            if let Err(e) = rt.block_on(serve::start_server(port, &config)) {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
    }
}
