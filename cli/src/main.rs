//! `gymdesk` command-line entry point.

use anyhow::Result;
use clap::Parser;
use gymdesk_cli::{cli::Cli, commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Default to info-level logs; override via RUST_LOG if needed.
    gymdesk_shared::logging::init_logging();

    let cli = Cli::parse();
    commands::run(cli).await
}
