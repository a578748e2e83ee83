//! Seeded synthetic workload.
//!
//! Stores `count` memories with uniformly random importance and, every few
//! stores, retrieves one earlier memory by key. Reports how many of the
//! retrievals still found their target and the final layer statistics.

use anyhow::{Context, Result};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tiermem_core::{MemoryStats, TierConfig, TieredMemoryStore};

use crate::cli::SimulateArgs;
use crate::config::Config;
use crate::output::print_stats;

/// Outcome of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub seed: u64,
    pub stored: usize,
    pub retrievals: usize,
    pub hits: usize,
    pub stats: MemoryStats,
}

impl SimulationReport {
    /// Fraction of retrievals that found their target
    pub fn hit_rate(&self) -> f64 {
        if self.retrievals == 0 {
            0.0
        } else {
            self.hits as f64 / self.retrievals as f64
        }
    }
}

/// Execute simulate command.
pub fn execute(args: SimulateArgs, config: &Config) -> Result<()> {
    let report = simulate(&config.memory, args.count, args.seed, args.retrieve_every)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    crate::output::apply(&config.output);

    println!(
        "{} stored {} memories (seed {}, scoring {})",
        "✓".green(),
        report.stored,
        report.seed,
        config.memory.scoring.to_string().cyan()
    );
    println!(
        "  retrievals: {}  hits: {}  hit rate: {:.1}%",
        report.retrievals,
        report.hits,
        report.hit_rate() * 100.0
    );
    println!();
    print_stats(&report.stats);

    Ok(())
}

/// Run the workload against a fresh store
pub fn simulate(
    config: &TierConfig,
    count: usize,
    seed: u64,
    retrieve_every: usize,
) -> Result<SimulationReport> {
    let store = TieredMemoryStore::new(config.clone()).context("Failed to create memory store")?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut retrievals = 0;
    let mut hits = 0;

    for i in 0..count {
        let importance: f64 = rng.gen_range(0.0..1.0);
        store
            .store(format!("memory-{}", i), importance)
            .context("Failed to store synthetic memory")?;

        if retrieve_every > 0 && (i + 1) % retrieve_every == 0 {
            let key = format!("memory-{}", rng.gen_range(0..=i));
            retrievals += 1;
            if !store.retrieve(|e| *e.content() == key).is_empty() {
                hits += 1;
            }
        }
    }

    tracing::info!(seed, stored = count, retrievals, hits, "Simulation finished");

    Ok(SimulationReport {
        seed,
        stored: count,
        retrievals,
        hits,
        stats: store.stats(),
    })
}
