//! llmtxt CLI - LLM-friendly documentation bundler.
//!
//! Provides commands for:
//! - `build`: Generate `llms.txt`, `llms-full.txt`, and page mirrors
//! - `serve`: Preview the generated artifacts over HTTP

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, ServeArgs};
use output::Output;

/// llmtxt - LLM-friendly documentation bundler.
#[derive(Parser)]
#[command(name = "llmtxt", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the LLM text artifacts from markdown sources.
    Build(BuildArgs),
    /// Serve the generated artifacts for preview.
    Serve(ServeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Build(args) => args.verbose,
        Commands::Serve(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Serve(args) => {
            match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(args.execute()),
                Err(err) => Err(error::CliError::Server(format!(
                    "Failed to create tokio runtime: {err}"
                ))),
            }
        }
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
