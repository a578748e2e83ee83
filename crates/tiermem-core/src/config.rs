//! Tier Configuration
//!
//! Capacities, routing thresholds and the eviction scoring policy for a
//! [`TieredMemoryStore`](crate::TieredMemoryStore). Fixed for the life of a store.

use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, MemoryResult};
use crate::memory::ScoringPolicy;

/// Tiered memory configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    /// Maximum entries held in working memory (default: 5)
    pub working_capacity: usize,

    /// Maximum entries held in short-term memory (default: 50)
    pub short_term_capacity: usize,

    /// Maximum entries held in long-term memory (default: 1000)
    pub long_term_capacity: usize,

    /// Importance strictly above this goes to working memory (default: 0.8)
    pub working_threshold: f64,

    /// Importance strictly above this goes to short-term memory (default: 0.5)
    pub short_term_threshold: f64,

    /// Eviction scoring policy shared by all three layers
    pub scoring: ScoringPolicy,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            working_capacity: 5,
            short_term_capacity: 50,
            long_term_capacity: 1000,
            working_threshold: 0.8,
            short_term_threshold: 0.5,
            scoring: ScoringPolicy::default(),
        }
    }
}

impl TierConfig {
    /// Parse a TOML document and validate it
    pub fn from_toml_str(content: &str) -> MemoryResult<Self> {
        let config: TierConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set all three capacities
    pub fn with_capacities(mut self, working: usize, short_term: usize, long_term: usize) -> Self {
        self.working_capacity = working;
        self.short_term_capacity = short_term;
        self.long_term_capacity = long_term;
        self
    }

    /// Set both routing thresholds
    pub fn with_thresholds(mut self, working: f64, short_term: f64) -> Self {
        self.working_threshold = working;
        self.short_term_threshold = short_term;
        self
    }

    /// Set the eviction scoring policy
    pub fn with_scoring(mut self, scoring: ScoringPolicy) -> Self {
        self.scoring = scoring;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> MemoryResult<()> {
        for (field, capacity) in [
            ("working_capacity", self.working_capacity),
            ("short_term_capacity", self.short_term_capacity),
            ("long_term_capacity", self.long_term_capacity),
        ] {
            if capacity == 0 {
                return Err(MemoryError::invalid_config(field, "must be greater than 0"));
            }
        }

        if !self.working_threshold.is_finite()
            || self.working_threshold <= 0.0
            || self.working_threshold >= 1.0
        {
            return Err(MemoryError::invalid_config(
                "working_threshold",
                format!("must be between 0 and 1 (exclusive), got {}", self.working_threshold),
            ));
        }

        if !self.short_term_threshold.is_finite()
            || self.short_term_threshold <= 0.0
            || self.short_term_threshold >= self.working_threshold
        {
            return Err(MemoryError::invalid_config(
                "short_term_threshold",
                format!(
                    "must be between 0 and working_threshold ({}), got {}",
                    self.working_threshold, self.short_term_threshold
                ),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TierConfig::default();
        assert_eq!(config.working_capacity, 5);
        assert_eq!(config.short_term_capacity, 50);
        assert_eq!(config.long_term_capacity, 1000);
        assert_eq!(config.working_threshold, 0.8);
        assert_eq!(config.short_term_threshold, 0.5);
        assert_eq!(config.scoring, ScoringPolicy::ImportanceAccess);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = TierConfig::default()
            .with_capacities(2, 3, 4)
            .with_thresholds(0.9, 0.4)
            .with_scoring(ScoringPolicy::Lru);

        assert_eq!(config.working_capacity, 2);
        assert_eq!(config.short_term_capacity, 3);
        assert_eq!(config.long_term_capacity, 4);
        assert_eq!(config.working_threshold, 0.9);
        assert_eq!(config.short_term_threshold, 0.4);
        assert_eq!(config.scoring, ScoringPolicy::Lru);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let err = TierConfig::default().with_capacities(0, 50, 1000).validate().unwrap_err();
        assert!(err.is_invalid_config());
        assert!(err.to_string().contains("working_capacity"));

        let err = TierConfig::default().with_capacities(5, 50, 0).validate().unwrap_err();
        assert!(err.to_string().contains("long_term_capacity"));

        // Threshold ordering
        assert!(TierConfig::default().with_thresholds(0.5, 0.5).validate().is_err());
        assert!(TierConfig::default().with_thresholds(0.5, 0.7).validate().is_err());
        assert!(TierConfig::default().with_thresholds(1.0, 0.5).validate().is_err());
        assert!(TierConfig::default().with_thresholds(0.8, 0.0).validate().is_err());
        assert!(TierConfig::default().with_thresholds(f64::NAN, 0.5).validate().is_err());
        assert!(TierConfig::default().with_thresholds(0.8, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_from_toml_partial_uses_defaults() {
        let config = TierConfig::from_toml_str(
            r#"
            working_capacity = 8
            scoring = "lfu"
            "#,
        )
        .unwrap();

        assert_eq!(config.working_capacity, 8);
        assert_eq!(config.short_term_capacity, 50);
        assert_eq!(config.scoring, ScoringPolicy::Lfu);
    }

    #[test]
    fn test_from_toml_rejects_negative_capacity() {
        let err = TierConfig::from_toml_str("short_term_capacity = -3").unwrap_err();
        assert!(err.is_invalid_config());
    }

    #[test]
    fn test_from_toml_rejects_zero_capacity() {
        let err = TierConfig::from_toml_str("long_term_capacity = 0").unwrap_err();
        assert!(err.is_invalid_config());
        assert!(err.to_string().contains("long_term_capacity"));
    }
}
