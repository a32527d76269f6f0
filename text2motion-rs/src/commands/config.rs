//! Settings command implementations

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::Settings;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display the current settings
    Show,

    /// Store the API key used for generation requests
    SetApiKey {
        /// API key issued by Text2Motion
        key: String,
    },

    /// Print the location of the settings file
    Path,
}

pub fn execute(cmd: ConfigCommands, config_path: Option<PathBuf>) -> Result<()> {
    let path = Settings::resolve_path(config_path.as_deref())
        .context("Failed to determine settings location")?;

    match cmd {
        ConfigCommands::Show => handle_show(&path),
        ConfigCommands::SetApiKey { key } => handle_set_api_key(&path, key),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn handle_show(path: &std::path::Path) -> Result<()> {
    let settings = Settings::load(path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;

    println!("Settings file:     {}", path.display());
    println!(
        "API key:           {}",
        settings
            .masked_api_key()
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!("Host:              {}", settings.host);
    println!("Model version:     {}", settings.model_version);
    println!("Action name:       {}", settings.action_name);
    println!("Apply root motion: {}", settings.apply_root_motion);
    println!("Frame rate:        {}", settings.frame_rate);
    println!("Timeout:           {}s", settings.timeout_secs);
    Ok(())
}

fn handle_set_api_key(path: &std::path::Path, key: String) -> Result<()> {
    let key = key.trim().to_string();
    if key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    let mut settings = Settings::load(path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;
    settings.api_key = Some(key);
    settings
        .save(path)
        .with_context(|| format!("Failed to save settings to {}", path.display()))?;

    println!("API key saved to {}", path.display());
    Ok(())
}
