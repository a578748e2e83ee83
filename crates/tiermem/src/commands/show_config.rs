//! Show the effective configuration.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::Config;

/// Execute config command.
pub fn execute(json: bool, config: &Config) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
        println!("{}", text);
        return Ok(());
    }

    crate::output::apply(&config.output);

    let path = Config::config_path();
    let source = if path.exists() { "file" } else { "defaults" };
    println!("{} {} ({})", "Config:".bold(), path.display(), source);
    println!();

    let text = toml::to_string_pretty(config).context("Failed to serialize config")?;
    print!("{}", text);

    Ok(())
}
