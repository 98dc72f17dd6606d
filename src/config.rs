/// Application configuration
///
/// Loaded once at startup from a TOML file in the user's config directory:
/// - Linux: ~/.config/memory/memory.toml
/// - macOS: ~/Library/Application Support/memory/memory.toml
/// - Windows: %APPDATA%\memory\memory.toml
///
/// Every field has a default, so a missing file (or a missing key) is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::state::export::DEFAULT_TASK;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Task name written into every logbook entry
    pub task_name: String,
    /// How long transient notices stay on screen
    pub notice_seconds: u64,
    /// tracing filter used when RUST_LOG is not set
    pub log_filter: String,
    pub capture: CaptureConfig,
    pub logbook: LogbookConfig,
}

/// External QR decoder run on each chosen photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub decoder_program: String,
    /// Arguments placed before the photo path
    pub decoder_args: Vec<String>,
}

/// External logbook application receiving the payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogbookConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Action name the logbook listens for
    pub action: String,
    /// Key the payload is filed under
    pub extra_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            task_name: DEFAULT_TASK.to_string(),
            notice_seconds: 2,
            log_filter: "info".to_string(),
            capture: CaptureConfig::default(),
            logbook: LogbookConfig::default(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            decoder_program: "zbarimg".to_string(),
            decoder_args: vec!["--raw".to_string(), "--quiet".to_string()],
        }
    }
}

impl Default for LogbookConfig {
    fn default() -> Self {
        Self {
            program: "logbook".to_string(),
            args: Vec::new(),
            action: "ch.apprun.intent.LOG".to_string(),
            extra_key: "ch.apprun.logmessage".to_string(),
        }
    }
}

impl AppConfig {
    /// Get the path where the config file is expected
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("memory");
        path.push("memory.toml");
        Some(path)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config from its default location, falling back to the
    /// defaults when it cannot be used
    pub fn load() -> (Self, ConfigSource) {
        let Some(path) = Self::default_path() else {
            return (Self::default(), ConfigSource::Defaults);
        };

        if !path.exists() {
            return (Self::default(), ConfigSource::Defaults);
        }

        match Self::load_from(&path) {
            Ok(config) => (config, ConfigSource::File(path)),
            Err(e) => (Self::default(), ConfigSource::Fallback(e)),
        }
    }
}

/// Where the active config came from. Reported once logging is up.
#[derive(Debug)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
    /// The file exists but could not be used
    Fallback(Error),
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Config loaded from {}", path.display()),
            ConfigSource::Defaults => info!("No config file, using defaults"),
            ConfigSource::Fallback(e) => warn!("{}, using defaults", e),
        }
    }
}
