//! Binary crate for the `trip` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive querying and endpoint configuration
//! - Human-friendly output formatting

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

/// Logs go to stderr so `--json` output stays clean. `RUST_LOG` wins over
/// `--verbose` when set.
fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,trip_core=debug,trip_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);
    cmd.run().await
}
