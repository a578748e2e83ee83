//! Bounded memory layer.
//!
//! A layer holds entries in insertion order and never grows past its
//! capacity: adding to a full layer evicts exactly one entry first.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::scoring::{ImportanceAccessScore, ScoringStrategy, select_victim};
use super::types::{LayerId, LayerStats, MemoryEntry};
use crate::error::{MemoryError, MemoryResult};

/// A fixed-capacity, insertion-ordered sequence of entries.
#[derive(Debug)]
pub struct MemoryLayer<T> {
    id: LayerId,
    capacity: usize,
    entries: Vec<MemoryEntry<T>>,
    strategy: Arc<dyn ScoringStrategy>,
    evictions: u64,
}

impl<T> MemoryLayer<T> {
    /// Create a layer scored by `importance * access_count`
    pub fn new(id: LayerId, capacity: usize) -> MemoryResult<Self> {
        Self::with_strategy(id, capacity, Arc::new(ImportanceAccessScore))
    }

    /// Create a layer with a custom eviction scoring strategy
    pub fn with_strategy(
        id: LayerId,
        capacity: usize,
        strategy: Arc<dyn ScoringStrategy>,
    ) -> MemoryResult<Self> {
        if capacity == 0 {
            return Err(MemoryError::invalid_config(
                format!("{}_capacity", id),
                "must be greater than 0",
            ));
        }

        Ok(Self::bounded(id, capacity, strategy))
    }

    /// Build a layer whose capacity the caller has already checked
    pub(crate) fn bounded(id: LayerId, capacity: usize, strategy: Arc<dyn ScoringStrategy>) -> Self {
        debug_assert!(capacity > 0);
        Self {
            id,
            capacity,
            entries: Vec::with_capacity(capacity.min(1024)),
            strategy,
            evictions: 0,
        }
    }

    /// Append an entry, evicting one first if the layer is full.
    ///
    /// Returns the evicted entry, if any.
    pub fn add(&mut self, entry: MemoryEntry<T>) -> Option<MemoryEntry<T>> {
        let evicted = if self.entries.len() >= self.capacity {
            self.evict_one()
        } else {
            None
        };

        debug!(layer = %self.id, id = %entry.id(), importance = entry.importance(), "Admitted memory entry");
        self.entries.push(entry);

        evicted
    }

    /// Remove the lowest-scoring entry (earliest inserted on ties).
    pub fn evict_one(&mut self) -> Option<MemoryEntry<T>> {
        let (index, score) = select_victim(
            self.strategy.as_ref(),
            self.entries.iter().map(MemoryEntry::stats),
        )?;

        let evicted = self.entries.remove(index);
        self.evictions += 1;

        debug!(
            layer = %self.id,
            id = %evicted.id(),
            score,
            strategy = self.strategy.name(),
            "Evicted memory entry"
        );

        Some(evicted)
    }

    /// Remove an entry by ID without counting it as an eviction
    pub fn remove(&mut self, id: Uuid) -> Option<MemoryEntry<T>> {
        let index = self.entries.iter().position(|e| e.id() == id)?;
        Some(self.entries.remove(index))
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries evicted over the layer's lifetime
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    pub fn strategy(&self) -> &dyn ScoringStrategy {
        self.strategy.as_ref()
    }

    pub fn stats(&self) -> LayerStats {
        LayerStats {
            size: self.entries.len(),
            capacity: self.capacity,
            evictions: self.evictions,
        }
    }
}

impl<T: Clone> MemoryLayer<T> {
    /// Return snapshots of every matching entry, touching each one.
    ///
    /// Snapshots are taken after the touch, so they carry the new count.
    pub fn retrieve<P>(&mut self, predicate: P) -> Vec<MemoryEntry<T>>
    where
        P: Fn(&MemoryEntry<T>) -> bool,
    {
        let mut results = Vec::new();
        for entry in self.entries.iter_mut() {
            if predicate(&*entry) {
                entry.touch();
                results.push(entry.clone());
            }
        }
        results
    }

    /// Return snapshots of every matching entry without touching them
    pub fn peek<P>(&self, predicate: P) -> Vec<MemoryEntry<T>>
    where
        P: Fn(&MemoryEntry<T>) -> bool,
    {
        self.entries.iter().filter(|e| predicate(*e)).cloned().collect()
    }
}
