//! Persisted user settings

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use t2m_client::{DEFAULT_HOST, DEFAULT_TIMEOUT_SECS, ModelVersion};
use t2m_rig::{DEFAULT_ACTION_NAME, DEFAULT_FRAME_RATE};
use thiserror::Error;

/// File name of the settings document inside the config directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Errors that can occur while reading or writing settings
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Filesystem I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid JSON
    #[error("Invalid settings file: {0}")]
    Json(#[from] serde_json::Error),

    /// User's home directory could not be determined
    #[error("Home directory not found")]
    NoHomeDirectory,
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Stored defaults for generation and import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub host: String,
    pub model_version: ModelVersion,
    pub action_name: String,
    pub apply_root_motion: bool,
    pub frame_rate: f32,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            host: DEFAULT_HOST.to_string(),
            model_version: ModelVersion::Stable,
            action_name: DEFAULT_ACTION_NAME.to_string(),
            apply_root_motion: true,
            frame_rate: DEFAULT_FRAME_RATE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Per-user settings location
    pub fn default_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("ai", "text2motion", "text2motion-rs") {
            Ok(proj_dirs.config_dir().join(SETTINGS_FILE))
        } else {
            Err(SettingsError::NoHomeDirectory)
        }
    }

    /// Resolve an explicit path or fall back to the default location
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_path(),
        }
    }

    /// Load settings; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Stored API key with everything but the last four characters hidden
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_deref().map(mask_secret)
    }
}

fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
