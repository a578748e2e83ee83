//! tiermem - Tiered Memory CLI
//!
//! Replays operation scripts and synthetic workloads against the tiered
//! importance store, printing placements, retrievals and eviction statistics.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod commands;
mod config;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (stderr keeps --json output clean)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(std::env::var("RUST_LOG").ok().as_deref(), cli.verbose)?)
        .init();

    // Load configuration
    let config = config::Config::load()?;

    // Execute command
    match cli.command {
        Commands::Replay(args) => commands::replay::execute(args, &config),
        Commands::Simulate(args) => commands::simulate::execute(args, &config),
        Commands::Config { json } => commands::show_config::execute(json, &config),
        Commands::Version => {
            println!("tiermem {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// `RUST_LOG` when set and valid, otherwise `tiermem=info` with the core
/// library at `warn`. `--verbose` always raises the core library to `debug`.
fn log_filter(rust_log: Option<&str>, verbose: bool) -> Result<EnvFilter> {
    let filter = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("tiermem=info,tiermem_core=warn"));

    if verbose {
        Ok(filter.add_directive("tiermem_core=debug".parse()?))
    } else {
        Ok(filter)
    }
}
