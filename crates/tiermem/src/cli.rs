//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tiered Memory CLI
///
/// Working, short-term and long-term layers with score-based eviction.
#[derive(Parser, Debug)]
#[command(name = "tiermem")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log admissions and evictions
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply a JSON-lines operation script to a fresh store
    Replay(ReplayArgs),

    /// Run a seeded synthetic workload and report eviction statistics
    Simulate(SimulateArgs),

    /// Show the effective configuration
    Config {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show version
    Version,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Script file, one operation per line ("-" reads stdin)
    pub file: PathBuf,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of memories to store
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub count: usize,

    /// Random seed
    #[arg(short, long, default_value_t = 42)]
    pub seed: u64,

    /// Retrieve a previously stored memory every N stores (0 disables)
    #[arg(short, long, default_value_t = 3)]
    pub retrieve_every: usize,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simulate_defaults() {
        let cli = Cli::try_parse_from(["tiermem", "simulate"]).unwrap();
        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.count, 1000);
                assert_eq!(args.seed, 42);
                assert_eq!(args.retrieve_every, 3);
                assert!(!args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_replay_with_global_verbose() {
        let cli = Cli::try_parse_from(["tiermem", "replay", "ops.jsonl", "--json", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.file, PathBuf::from("ops.jsonl"));
                assert!(args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
