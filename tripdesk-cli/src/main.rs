//! Binary crate for the `tripdesk` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and collecting API keys
//! - Wiring settings and services into the core flows
//! - Human-friendly output formatting

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Keys in a local .env act as environment defaults for the flags.
    dotenvy::dotenv().ok();

    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);

    cmd.run().await
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,tripdesk_core=debug,tripdesk=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
