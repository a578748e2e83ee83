//! Configuration management for tiermem.
//!
//! Configuration is loaded with precedence:
//! 1. Config file named by `TIERMEM_CONFIG`
//! 2. Config file in the data directory (`<data dir>/config.toml`)
//! 3. Default values

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tiermem_core::TierConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Layer capacities, thresholds and scoring policy
    #[serde(default)]
    pub memory: TierConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Colorize terminal output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Number of entries to show per retrieval in human output
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: default_true(),
            preview_limit: default_preview_limit(),
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_preview_limit() -> usize {
    5
}

fn default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("dev", "tiermem", "tiermem") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tiermem")
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load and validate a specific config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .memory
            .validate()
            .context("Invalid [memory] configuration")?;

        tracing::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("TIERMEM_CONFIG") {
            PathBuf::from(path)
        } else {
            default_data_dir().join("config.toml")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tiermem_core::ScoringPolicy;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.memory, TierConfig::default());
        assert!(config.output.color);
        assert_eq!(config.output.preview_limit, 5);
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
            [memory]
            working_capacity = 10
            working_threshold = 0.9
            scoring = "lru"

            [output]
            color = false
            "#,
        );

        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(config.memory.working_capacity, 10);
        assert_eq!(config.memory.working_threshold, 0.9);
        assert_eq!(config.memory.short_term_capacity, 50);
        assert_eq!(config.memory.scoring, ScoringPolicy::Lru);
        assert!(!config.output.color);
        assert_eq!(config.output.preview_limit, 5);
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let file = write_config("");
        assert_eq!(Config::load_from(file.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_load_rejects_invalid_memory_config() {
        let file = write_config("[memory]\nshort_term_threshold = 0.95\n");
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("short_term_threshold"));

        let file = write_config("[memory]\nworking_capacity = -1\n");
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
