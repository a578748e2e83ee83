//! Memory Error Types
//!
//! Errors raised by the tiered memory core. Collaborator errors
//! (templates, assistant runs) live next to their modules.

use thiserror::Error;

/// Memory result type alias
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Tiered memory errors
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Rejected at construction time; nothing is created
    #[error("invalid configuration for {field}: {message}")]
    InvalidConfig { field: String, message: String },

    /// Rejected at store time; store state is unchanged
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl MemoryError {
    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Check if this error is a configuration error
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }

    /// Check if this error is an input error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}

impl From<toml::de::Error> for MemoryError {
    fn from(e: toml::de::Error) -> Self {
        MemoryError::invalid_config("toml", e.to_string())
    }
}
