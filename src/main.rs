//! Refgraph CLI entry point

use clap::{Parser, Subcommand, ValueEnum};
use refgraph_loader::DocumentFormat;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "refgraph")]
#[command(about = "Resolve JSON References into a shared document graph", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Document format (defaults to detection by file extension)
    #[arg(short, long, global = true, value_enum)]
    format: Option<FormatArg>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document, resolve its references and print a summary
    Check {
        /// Document to load
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the value a JSON Pointer resolves to
    Get {
        /// Document to load
        file: PathBuf,

        /// JSON Pointer, e.g. /definitions/node
        pointer: String,
    },
    /// Show version
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Yaml,
}

impl From<FormatArg> for DocumentFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => DocumentFormat::Json,
            FormatArg::Yaml => DocumentFormat::Yaml,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "refgraph={},refgraph_core={},refgraph_loader={}",
            log_level, log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = cli.format.map(DocumentFormat::from);

    match cli.command {
        Commands::Check { file, json } => commands::check(&file, format, json),
        Commands::Get { file, pointer } => commands::get(&file, format, &pointer),
        Commands::Version => {
            println!("refgraph v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
