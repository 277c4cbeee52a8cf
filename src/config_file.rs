//! Configuration file management
//!
//! The config file is a small YAML document:
//!
//! ```yaml
//! key: F15
//! time: 290
//! autostart: true
//! hotkey: ctrl+alt+shift+KeyC   # optional
//! ```
//!
//! Loading never fails: any problem with the file is logged and the
//! built-in defaults are used instead.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_AUTOSTART, DEFAULT_INTERVAL_SECONDS, DEFAULT_KEY,
};

/// Application configuration stored in config.yaml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Name of the key to press (F1-F16, default: F15)
    pub key: String,
    /// Seconds between two presses (default: 290)
    pub time: u64,
    /// Start keeping the system awake as soon as the tray app launches
    pub autostart: bool,
    /// Optional global hotkey that toggles the loop, e.g. "ctrl+alt+shift+KeyC"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotkey: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY.to_string(),
            time: DEFAULT_INTERVAL_SECONDS,
            autostart: DEFAULT_AUTOSTART,
            hotkey: None,
        }
    }
}

impl Config {
    /// Strictly parse a config document
    ///
    /// Fields missing from the document keep their defaults. The key name
    /// is not checked here; it is resolved when the loop is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The document is empty
    /// - YAML parsing fails or the document is not a mapping
    /// - `time` is zero
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.iter().all(u8::is_ascii_whitespace) {
            anyhow::bail!("Config file is empty");
        }

        let config: Config = serde_yaml::from_slice(data).context("Failed to parse config file")?;

        if config.time == 0 {
            anyhow::bail!("Invalid config: time must be greater than zero");
        }

        Ok(config)
    }

    /// Interval between two presses
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.time)
    }

    /// Render the config as a YAML document
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }
}

/// Location of the config file plus the load/create operations on it
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store backed by an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by the standard config file path
    ///
    /// - macOS: `~/Library/Application Support/caffeine/config.yaml`
    /// - Linux: `~/.config/caffeine/config.yaml`
    /// - Windows: `%APPDATA%\caffeine\config.yaml`
    pub fn standard() -> Result<Self> {
        let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(Self::new(config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the config directory and a default config file if missing
    ///
    /// An existing file is never touched, even if it is invalid.
    pub fn ensure_exists(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        if !self.path.exists() {
            let contents = Config::default().to_yaml()?;
            fs::write(&self.path, contents).with_context(|| {
                format!("Failed to write config file: {}", self.path.display())
            })?;
            log::info!("Default configuration written to: {}", self.path.display());
        }

        Ok(())
    }

    /// Startup sequence: create the config file if missing, then load it
    ///
    /// Only a failure to create the file is an error; an unusable file
    /// still yields the defaults.
    pub fn open(&self) -> Result<Config> {
        self.ensure_exists()?;
        Ok(self.load())
    }

    /// Load the config, falling back to defaults on any failure
    pub fn load(&self) -> Config {
        match self.try_load() {
            Ok(config) => {
                log::info!("Config loaded: {:?}", config);
                config
            }
            Err(e) => {
                log::warn!("Invalid config file, using defaults: {:#}", e);
                Config::default()
            }
        }
    }

    /// Load the config, reporting why it could not be used
    pub fn try_load(&self) -> Result<Config> {
        let data = fs::read(&self.path)
            .with_context(|| format!("Failed to read config file: {}", self.path.display()))?;
        Config::parse(&data)
    }
}
