//! Tiered Importance Memory
//!
//! Implements a three-layer memory cache:
//! - Working: the few most important entries (importance > 0.8 by default)
//! - Short-term: moderately important entries (importance > 0.5)
//! - Long-term: everything else, with the largest capacity
//!
//! # Architecture
//!
//! ```text
//! store(content, importance)
//!          │
//!          ▼  route by threshold (strict >)
//! ┌─────────────┐  ┌─────────────┐  ┌─────────────┐
//! │   Working   │  │ Short-Term  │  │  Long-Term  │
//! │  cap: 5     │  │  cap: 50    │  │  cap: 1000  │
//! └─────────────┘  └─────────────┘  └─────────────┘
//!          │              │                │
//!          └──────────────┴────────────────┘
//!                         ▼
//!          retrieve_by(predicate, layers) → touch + snapshot
//! ```
//!
//! Each layer evicts its lowest-scoring entry when full. The default score is
//! `importance * access_count`, so retrieval is what keeps an entry resident.

mod hierarchical;
mod layer;
mod scoring;
mod types;

pub use hierarchical::TieredMemoryStore;
pub use layer::MemoryLayer;
pub use scoring::{
    ImportanceAccessScore, ImportanceScore, LfuScore, LruScore, ScoringPolicy, ScoringStrategy,
};
pub use types::{EntryStats, LayerId, LayerStats, MemoryEntry, MemoryStats, StoreOutcome};
