//! Command implementations.

pub mod replay;
pub mod show_config;
pub mod simulate;
