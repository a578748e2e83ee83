//! Eviction scoring strategies.
//!
//! A layer evicts the resident entry with the lowest score, breaking ties in
//! favour of the earliest inserted entry.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::types::EntryStats;
use crate::utils::timestamp_millis;

/// Scores an entry for eviction. Lower scores are evicted first.
pub trait ScoringStrategy: Send + Sync + fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Score a resident entry
    fn score(&self, entry: &EntryStats) -> f64;
}

/// `importance * access_count`
///
/// An entry that was never retrieved scores 0 whatever its importance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportanceAccessScore;

impl ScoringStrategy for ImportanceAccessScore {
    fn name(&self) -> &'static str {
        "importance_access"
    }

    fn score(&self, entry: &EntryStats) -> f64 {
        entry.importance * entry.access_count as f64
    }
}

/// Importance alone
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportanceScore;

impl ScoringStrategy for ImportanceScore {
    fn name(&self) -> &'static str {
        "importance"
    }

    fn score(&self, entry: &EntryStats) -> f64 {
        entry.importance
    }
}

/// Least recently used: the oldest last access scores lowest
#[derive(Debug, Clone, Copy, Default)]
pub struct LruScore;

impl ScoringStrategy for LruScore {
    fn name(&self) -> &'static str {
        "lru"
    }

    fn score(&self, entry: &EntryStats) -> f64 {
        timestamp_millis(&entry.last_accessed_at)
    }
}

/// Least frequently used
#[derive(Debug, Clone, Copy, Default)]
pub struct LfuScore;

impl ScoringStrategy for LfuScore {
    fn name(&self) -> &'static str {
        "lfu"
    }

    fn score(&self, entry: &EntryStats) -> f64 {
        entry.access_count as f64
    }
}

/// Built-in scoring policies, selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    #[default]
    ImportanceAccess,
    Importance,
    Lru,
    Lfu,
}

impl ScoringPolicy {
    /// Build the strategy for this policy
    pub fn strategy(&self) -> Arc<dyn ScoringStrategy> {
        match self {
            Self::ImportanceAccess => Arc::new(ImportanceAccessScore),
            Self::Importance => Arc::new(ImportanceScore),
            Self::Lru => Arc::new(LruScore),
            Self::Lfu => Arc::new(LfuScore),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImportanceAccess => "importance_access",
            Self::Importance => "importance",
            Self::Lru => "lru",
            Self::Lfu => "lfu",
        }
    }
}

impl fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Index of the entry to evict: lowest score, earliest on ties.
///
/// NaN scores never win; if every score is NaN the first entry is chosen.
pub(crate) fn select_victim<I>(strategy: &dyn ScoringStrategy, entries: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = EntryStats>,
{
    let mut victim: Option<(usize, f64)> = None;

    for (index, stats) in entries.into_iter().enumerate() {
        let score = strategy.score(&stats);
        victim = match victim {
            None => Some((index, score)),
            // Strict comparison keeps the earlier entry on ties
            Some((_, best)) if score < best || (best.is_nan() && !score.is_nan()) => {
                Some((index, score))
            }
            keep => keep,
        };
    }

    victim
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn stats(importance: f64, access_count: u64) -> EntryStats {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        EntryStats {
            importance,
            access_count,
            created_at: at,
            last_accessed_at: at,
        }
    }

    #[test]
    fn test_importance_access_score() {
        let scorer = ImportanceAccessScore;
        assert_eq!(scorer.score(&stats(0.9, 0)), 0.0);
        assert_eq!(scorer.score(&stats(0.2, 5)), 1.0);
    }

    #[test]
    fn test_policy_strategies() {
        let entry = stats(0.4, 3);
        assert_eq!(ScoringPolicy::ImportanceAccess.strategy().name(), "importance_access");
        assert_eq!(ScoringPolicy::Importance.strategy().score(&entry), 0.4);
        assert_eq!(ScoringPolicy::Lfu.strategy().score(&entry), 3.0);
        assert_eq!(ScoringPolicy::default(), ScoringPolicy::ImportanceAccess);
    }

    #[test]
    fn test_lru_prefers_oldest_access() {
        let old = stats(0.9, 10);
        let mut recent = stats(0.1, 0);
        recent.last_accessed_at = old.last_accessed_at + Duration::seconds(5);

        let victim = select_victim(&LruScore, [recent, old]).unwrap();
        assert_eq!(victim.0, 1);
    }

    #[test]
    fn test_select_victim_tie_goes_to_earliest() {
        let victim = select_victim(&ImportanceAccessScore, [stats(0.9, 0), stats(0.1, 0)]).unwrap();
        assert_eq!(victim, (0, 0.0));
    }

    #[test]
    fn test_select_victim_lowest_score() {
        let victim = select_victim(&ImportanceAccessScore, [stats(0.2, 5), stats(0.9, 0)]).unwrap();
        assert_eq!(victim.0, 1);
    }

    #[test]
    fn test_select_victim_empty() {
        assert!(select_victim(&ImportanceAccessScore, Vec::<EntryStats>::new()).is_none());
    }

    #[derive(Debug)]
    struct NanForZeroAccess;

    impl ScoringStrategy for NanForZeroAccess {
        fn name(&self) -> &'static str {
            "nan"
        }

        fn score(&self, entry: &EntryStats) -> f64 {
            if entry.access_count == 0 {
                f64::NAN
            } else {
                entry.importance
            }
        }
    }

    #[test]
    fn test_select_victim_skips_nan() {
        let victim = select_victim(&NanForZeroAccess, [stats(0.5, 0), stats(0.7, 1)]).unwrap();
        assert_eq!(victim.0, 1);

        let victim = select_victim(&NanForZeroAccess, [stats(0.5, 0), stats(0.7, 0)]).unwrap();
        assert_eq!(victim.0, 0);
    }

    #[test]
    fn test_policy_serde_names() {
        assert_eq!(
            serde_json::to_string(&ScoringPolicy::ImportanceAccess).unwrap(),
            "\"importance_access\""
        );
        let policy: ScoringPolicy = serde_json::from_str("\"lru\"").unwrap();
        assert_eq!(policy, ScoringPolicy::Lru);
    }
}
