//! Memory Type Definitions
//!
//! Defines the entry, layer identity and statistics types for the tiered store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{MemoryError, MemoryResult};
use crate::utils::{content_fingerprint, now_utc};

/// Memory layer (working, short-term, long-term)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerId {
    Working,
    ShortTerm,
    LongTerm,
}

impl LayerId {
    /// All layers in retrieval priority order
    pub const ALL: [LayerId; 3] = [LayerId::Working, LayerId::ShortTerm, LayerId::LongTerm];

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Working => "working",
            Self::ShortTerm => "short_term",
            Self::LongTerm => "long_term",
        }
    }

    /// Position in [`LayerId::ALL`]
    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Working => 0,
            Self::ShortTerm => 1,
            Self::LongTerm => 2,
        }
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LayerId {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "working" => Ok(Self::Working),
            "short_term" => Ok(Self::ShortTerm),
            "long_term" => Ok(Self::LongTerm),
            other => Err(MemoryError::invalid_input(format!(
                "unknown layer: {} (expected working, short_term or long_term)",
                other
            ))),
        }
    }
}

/// A single remembered value
///
/// `created_at` and `importance` are fixed at construction; only
/// [`touch`](MemoryEntry::touch) mutates an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry<T> {
    id: Uuid,
    content: T,
    importance: f64,
    fingerprint: Option<String>,
    created_at: DateTime<Utc>,
    last_accessed_at: DateTime<Utc>,
    access_count: u64,
}

impl<T: Serialize> MemoryEntry<T> {
    /// Create a new entry with zero accesses
    ///
    /// Fails with `InvalidInput` if `importance` is NaN or infinite. Content
    /// that has no JSON encoding is accepted but gets no fingerprint.
    pub fn new(content: T, importance: f64) -> MemoryResult<Self> {
        if !importance.is_finite() {
            return Err(MemoryError::invalid_input(format!(
                "importance must be a finite number, got {}",
                importance
            )));
        }

        let fingerprint = content_fingerprint(&content).ok();
        let now = now_utc();

        Ok(Self {
            id: Uuid::new_v4(),
            content,
            importance,
            fingerprint,
            created_at: now,
            last_accessed_at: now,
            access_count: 0,
        })
    }
}

impl<T> MemoryEntry<T> {
    /// Record one retrieval
    pub fn touch(&mut self) {
        self.access_count = self.access_count.saturating_add(1);
        self.last_accessed_at = now_utc();
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn content(&self) -> &T {
        &self.content
    }

    /// Consume the entry, keeping only its payload
    pub fn into_content(self) -> T {
        self.content
    }

    pub fn importance(&self) -> f64 {
        self.importance
    }

    /// SHA-256 of the JSON-encoded content, if it has one
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_accessed_at(&self) -> DateTime<Utc> {
        self.last_accessed_at
    }

    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    /// Numeric view consumed by scoring strategies
    pub fn stats(&self) -> EntryStats {
        EntryStats {
            importance: self.importance,
            access_count: self.access_count,
            created_at: self.created_at,
            last_accessed_at: self.last_accessed_at,
        }
    }
}

/// The fields of an entry a scoring strategy may read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryStats {
    pub importance: f64,
    pub access_count: u64,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
}

/// Result of placing a value in the store
#[derive(Debug, Clone)]
pub struct StoreOutcome<T> {
    /// Layer the entry was routed to
    pub layer: LayerId,
    /// ID of the new entry
    pub id: Uuid,
    /// Entry displaced to make room, if the layer was full
    pub evicted: Option<MemoryEntry<T>>,
}

/// Per-layer statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerStats {
    pub size: usize,
    pub capacity: usize,
    pub evictions: u64,
}

/// Memory statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub working: LayerStats,
    pub short_term: LayerStats,
    pub long_term: LayerStats,
    pub total: usize,
}

impl MemoryStats {
    /// Statistics for one layer
    pub fn layer(&self, layer: LayerId) -> &LayerStats {
        match layer {
            LayerId::Working => &self.working,
            LayerId::ShortTerm => &self.short_term,
            LayerId::LongTerm => &self.long_term,
        }
    }

    /// Evictions across all layers
    pub fn total_evictions(&self) -> u64 {
        self.working.evictions + self.short_term.evictions + self.long_term.evictions
    }
}
