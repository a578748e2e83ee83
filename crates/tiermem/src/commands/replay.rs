//! Replay a JSON-lines operation script against a fresh store.
//!
//! Each non-empty line is one operation:
//!
//! ```text
//! {"op":"store","content":"git status","importance":0.9}
//! {"op":"retrieve","contains":"git","layers":["working","short_term"]}
//! {"op":"forget","id":"6f1c…"}
//! ```
//!
//! Lines starting with `#` are comments. Lines that fail to parse are
//! reported and skipped.

use std::io::Read;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tiermem_core::utils::format_datetime;
use tiermem_core::{LayerId, MemoryEntry, MemoryStats, TieredMemoryStore};
use uuid::Uuid;

use crate::cli::ReplayArgs;
use crate::config::Config;
use crate::output::{layer_display, preview, print_stats};

/// One scripted operation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Store {
        content: Value,
        importance: f64,
    },
    Retrieve {
        /// Substring to match; omitted matches every entry
        #[serde(default)]
        contains: Option<String>,
        /// Layers to scan in order; omitted scans all
        #[serde(default)]
        layers: Option<Vec<LayerId>>,
    },
    Forget {
        id: Uuid,
    },
}

/// What happened for one script line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Stored {
        line: usize,
        id: Uuid,
        layer: LayerId,
        evicted: Option<Uuid>,
    },
    Retrieved {
        line: usize,
        matches: Vec<Match>,
    },
    Forgotten {
        line: usize,
        id: Uuid,
        found: bool,
    },
    Skipped {
        line: usize,
        reason: String,
    },
}

/// A retrieved entry as reported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub id: Uuid,
    pub content: Value,
    pub importance: f64,
    pub access_count: u64,
    pub created_at: String,
}

impl From<MemoryEntry<Value>> for Match {
    fn from(entry: MemoryEntry<Value>) -> Self {
        Self {
            id: entry.id(),
            importance: entry.importance(),
            access_count: entry.access_count(),
            created_at: format_datetime(&entry.created_at()),
            content: entry.into_content(),
        }
    }
}

/// Result of a whole replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub events: Vec<Event>,
    pub stats: MemoryStats,
}

/// Execute replay command.
pub fn execute(args: ReplayArgs, config: &Config) -> Result<()> {
    let script = if args.file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read script from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.file)
            .with_context(|| format!("Failed to read script {}", args.file.display()))?
    };

    let store = TieredMemoryStore::new(config.memory.clone())
        .context("Failed to create memory store")?;
    let report = replay(&script, &store);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    crate::output::apply(&config.output);
    print_report(&report, config.output.preview_limit);

    Ok(())
}

/// Apply every operation in `script` to `store`
pub fn replay(script: &str, store: &TieredMemoryStore<Value>) -> ReplayReport {
    let mut events = Vec::new();

    for (index, raw) in script.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let event = match serde_json::from_str::<Operation>(trimmed) {
            Ok(op) => apply(line, op, store),
            Err(e) => Event::Skipped {
                line,
                reason: e.to_string(),
            },
        };

        if let Event::Skipped { reason, .. } = &event {
            tracing::warn!(line, %reason, "Skipping script line");
        }
        events.push(event);
    }

    ReplayReport {
        events,
        stats: store.stats(),
    }
}

fn apply(line: usize, op: Operation, store: &TieredMemoryStore<Value>) -> Event {
    match op {
        Operation::Store { content, importance } => match store.store(content, importance) {
            Ok(outcome) => Event::Stored {
                line,
                id: outcome.id,
                layer: outcome.layer,
                evicted: outcome.evicted.map(|e| e.id()),
            },
            Err(e) => Event::Skipped {
                line,
                reason: e.to_string(),
            },
        },

        Operation::Retrieve { contains, layers } => {
            let predicate = |entry: &MemoryEntry<Value>| match &contains {
                Some(needle) => content_matches(entry.content(), needle),
                None => true,
            };
            let entries = match layers {
                Some(layers) => store.retrieve_by(predicate, &layers),
                None => store.retrieve(predicate),
            };
            Event::Retrieved {
                line,
                matches: entries.into_iter().map(Match::from).collect(),
            }
        }

        Operation::Forget { id } => Event::Forgotten {
            line,
            id,
            found: store.forget(id).is_some(),
        },
    }
}

/// Case-insensitive substring match over a JSON payload
fn content_matches(content: &Value, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    match content {
        Value::String(s) => s.to_lowercase().contains(&needle),
        other => other.to_string().to_lowercase().contains(&needle),
    }
}

fn print_report(report: &ReplayReport, preview_limit: usize) {
    for event in &report.events {
        match event {
            Event::Stored { line, id, layer, evicted } => {
                println!(
                    "{} line {}: stored {} in {} memory",
                    "✓".green(),
                    line,
                    id,
                    layer_display(*layer).cyan()
                );
                if let Some(evicted) = evicted {
                    println!("    {} evicted {}", "↳".yellow(), evicted);
                }
            }
            Event::Retrieved { line, matches } => {
                println!("{} line {}: {} match(es)", "→".blue(), line, matches.len());
                for m in matches.iter().take(preview_limit) {
                    println!(
                        "    [{:.2}, {}x] {}",
                        m.importance,
                        m.access_count,
                        preview(&m.content, 60)
                    );
                }
                if matches.len() > preview_limit {
                    println!("    … {} more", matches.len() - preview_limit);
                }
            }
            Event::Forgotten { line, id, found } => {
                if *found {
                    println!("{} line {}: forgot {}", "✓".green(), line, id);
                } else {
                    println!("{} line {}: {} not found", "·".dimmed(), line, id);
                }
            }
            Event::Skipped { line, reason } => {
                println!("{} line {}: skipped ({})", "✗".red(), line, reason);
            }
        }
    }

    println!();
    print_stats(&report.stats);
}
