//! Loadtree CLI Binary
//!
//! Command-line interface for resolving and managing loading contexts.

use anyhow::Context;
use clap::Parser;
use loadtree::logging::init_logging;
use loadtree::tooling::cli::{Cli, CliContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = cli.load_config().context("Failed to load configuration")?;
    init_logging(Some(&config.logging)).context("Failed to initialize logging")?;

    let context = CliContext::new(&config).context("Failed to initialize loader service")?;
    let output = context.execute(&cli.command).await?;
    println!("{}", output);
    Ok(())
}
