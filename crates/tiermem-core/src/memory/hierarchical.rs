//! Tiered Memory Store
//!
//! Routes each new entry to exactly one of three layers by importance and
//! fans retrieval out across layers in priority order. Entries never move
//! between layers after placement.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::layer::MemoryLayer;
use super::types::{LayerId, MemoryEntry, MemoryStats, StoreOutcome};
use crate::config::TierConfig;
use crate::error::MemoryResult;
use crate::utils::content_fingerprint;

/// Three-tier importance cache
///
/// Each layer sits behind its own mutex, so operations take `&self` and the
/// store can be shared across threads (e.g. behind an `Arc`). No operation
/// holds more than one layer lock at a time.
#[derive(Debug)]
pub struct TieredMemoryStore<T> {
    config: TierConfig,
    layers: [Mutex<MemoryLayer<T>>; 3],
}

impl<T> TieredMemoryStore<T> {
    /// Create a store from a validated configuration
    pub fn new(config: TierConfig) -> MemoryResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create a store with the default capacities and thresholds
    pub fn with_defaults() -> Self {
        Self::build(TierConfig::default())
    }

    /// Assemble the layers; `config` must already be valid
    fn build(config: TierConfig) -> Self {
        let strategy = config.scoring.strategy();
        let layers = [
            (LayerId::Working, config.working_capacity),
            (LayerId::ShortTerm, config.short_term_capacity),
            (LayerId::LongTerm, config.long_term_capacity),
        ]
        .map(|(id, capacity)| Mutex::new(MemoryLayer::bounded(id, capacity, strategy.clone())));

        info!(
            working = config.working_capacity,
            short_term = config.short_term_capacity,
            long_term = config.long_term_capacity,
            scoring = %config.scoring,
            "Tiered memory store created"
        );

        Self { config, layers }
    }

    pub fn config(&self) -> &TierConfig {
        &self.config
    }

    /// Layer an entry of this importance is placed in
    ///
    /// Comparisons are strict: a value equal to a threshold belongs to the
    /// lower-priority layer.
    pub fn tier_for(&self, importance: f64) -> LayerId {
        if importance > self.config.working_threshold {
            LayerId::Working
        } else if importance > self.config.short_term_threshold {
            LayerId::ShortTerm
        } else {
            LayerId::LongTerm
        }
    }

    /// Remove an entry by ID from whichever layer holds it
    pub fn forget(&self, id: Uuid) -> Option<MemoryEntry<T>> {
        LayerId::ALL
            .iter()
            .find_map(|layer| self.lock(*layer).remove(id))
    }

    pub fn layer_size(&self, layer: LayerId) -> usize {
        self.lock(layer).size()
    }

    pub fn layer_capacity(&self, layer: LayerId) -> usize {
        self.lock(layer).capacity()
    }

    /// Total entries across all layers
    pub fn len(&self) -> usize {
        LayerId::ALL.iter().map(|layer| self.layer_size(*layer)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get memory statistics
    pub fn stats(&self) -> MemoryStats {
        let working = self.lock(LayerId::Working).stats();
        let short_term = self.lock(LayerId::ShortTerm).stats();
        let long_term = self.lock(LayerId::LongTerm).stats();

        MemoryStats {
            working,
            short_term,
            long_term,
            total: working.size + short_term.size + long_term.size,
        }
    }

    fn lock(&self, layer: LayerId) -> MutexGuard<'_, MemoryLayer<T>> {
        // A panicking predicate can leave a retrieval partly touched, but never
        // breaks ordering or the capacity bound, so the layer stays usable
        self.layers[layer.index()]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Serialize> TieredMemoryStore<T> {
    /// Store a value, routing it by importance
    ///
    /// Fails with `InvalidInput` for a non-finite importance; the store is
    /// left unchanged in that case.
    pub fn store(&self, content: T, importance: f64) -> MemoryResult<StoreOutcome<T>> {
        let entry = MemoryEntry::new(content, importance)?;
        let layer = self.tier_for(importance);
        let id = entry.id();

        let evicted = self.lock(layer).add(entry);

        debug!(
            layer = %layer,
            id = %id,
            importance,
            evicted = evicted.is_some(),
            "Stored memory"
        );

        Ok(StoreOutcome { layer, id, evicted })
    }
}

impl<T: Clone> TieredMemoryStore<T> {
    /// Retrieve matching entries from every layer in priority order
    pub fn retrieve<P>(&self, predicate: P) -> Vec<MemoryEntry<T>>
    where
        P: Fn(&MemoryEntry<T>) -> bool,
    {
        self.retrieve_by(predicate, &LayerId::ALL)
    }

    /// Retrieve matching entries from the given layers, in the given order
    ///
    /// Results are concatenated layer by layer, insertion order within a
    /// layer. Every returned entry is touched once; a layer listed twice is
    /// only scanned at its first position.
    ///
    /// The predicate runs while the layer's lock is held, so it must not call
    /// back into this store; doing so deadlocks.
    pub fn retrieve_by<P>(&self, predicate: P, layers: &[LayerId]) -> Vec<MemoryEntry<T>>
    where
        P: Fn(&MemoryEntry<T>) -> bool,
    {
        let mut seen = [false; 3];
        let mut results = Vec::new();

        for layer in layers {
            if std::mem::replace(&mut seen[layer.index()], true) {
                continue;
            }
            results.extend(self.lock(*layer).retrieve(&predicate));
        }

        results
    }

    /// Snapshot a layer's entries without touching them
    pub fn peek(&self, layer: LayerId) -> Vec<MemoryEntry<T>> {
        self.lock(layer).peek(|_| true)
    }
}

impl<T: Clone + Serialize> TieredMemoryStore<T> {
    /// Retrieve entries whose content fingerprint matches `content`
    ///
    /// Fails with `InvalidInput` when `content` itself has no JSON encoding.
    /// Entries stored without a fingerprint never match.
    pub fn retrieve_by_fingerprint(&self, content: &T) -> MemoryResult<Vec<MemoryEntry<T>>> {
        let fingerprint = content_fingerprint(content)?;
        Ok(self.retrieve(|entry| entry.fingerprint() == Some(fingerprint.as_str())))
    }
}

impl<T> Default for TieredMemoryStore<T> {
    fn default() -> Self {
        Self::with_defaults()
    }
}
