mod commands;
mod runner;
mod tap;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Tuber-crop disease diagnosis from classifier labels and observed symptoms.
#[derive(Parser)]
#[command(
    name = "tuberdx",
    version,
    about = "Tuber-crop disease diagnosis from classifier labels and observed symptoms"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diagnose one case from a JSON observation document
    Diagnose {
        /// Path to the facts JSON file, or `-` for stdin
        facts: PathBuf,
        /// Print `title|body` lines instead of formatted records
        #[arg(long)]
        wire: bool,
    },

    /// List the built-in rule catalog in declaration order
    Rules,

    /// Show the canonical label and information card for a classifier class id
    Label {
        /// Raw class id emitted by the classifier (e.g. cassava_blight)
        class_id: String,
    },

    /// Run the diagnosis conformance suite
    Test {
        /// Path to the conformance suite directory
        #[arg(default_value = "conformance/diagnose")]
        suite_dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Diagnose { facts, wire } => {
            commands::diagnose::cmd_diagnose(&facts, wire, cli.output, cli.quiet);
        }
        Commands::Rules => {
            commands::rules::cmd_rules(cli.output);
        }
        Commands::Label { class_id } => {
            commands::label::cmd_label(&class_id, cli.output);
        }
        Commands::Test { suite_dir } => {
            commands::test::cmd_test(&suite_dir, cli.quiet);
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
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
