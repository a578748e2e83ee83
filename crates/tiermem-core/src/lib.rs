//! tiermem-core - Tiered Importance Memory
//!
//! An in-process, three-layer memory cache. Each stored value is routed to
//! exactly one layer by its importance, and each layer evicts by score when
//! full:
//!
//! - **memory** - `TieredMemoryStore`, `MemoryLayer`, `MemoryEntry` and the
//!   pluggable eviction scoring strategies
//! - **config** - Capacities, thresholds and scoring policy
//! - **collab** - Collaborators a caller wires around the store: prompt
//!   templates, remote assistant sessions, and an assistant object cache
//!
//! # Example
//!
//! ```rust
//! use tiermem_core::{LayerId, TieredMemoryStore};
//!
//! fn example() -> tiermem_core::MemoryResult<()> {
//!     let store = TieredMemoryStore::with_defaults();
//!
//!     let outcome = store.store("User prefers dark mode".to_string(), 0.9)?;
//!     assert_eq!(outcome.layer, LayerId::Working);
//!
//!     // Retrieval touches every match, protecting it from eviction
//!     let found = store.retrieve(|e| e.content().contains("dark mode"));
//!     assert_eq!(found[0].access_count(), 1);
//!
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod memory;
pub mod utils;

#[cfg(feature = "collab")]
pub mod collab;

mod config;
mod error;

// Re-export main types
pub use config::TierConfig;
pub use error::{MemoryError, MemoryResult};
pub use memory::{
    EntryStats, LayerId, LayerStats, MemoryEntry, MemoryLayer, MemoryStats, ScoringPolicy,
    ScoringStrategy, StoreOutcome, TieredMemoryStore,
};
