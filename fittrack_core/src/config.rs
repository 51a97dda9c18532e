//! Configuration file support for fittrack.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fittrack/config.toml`.
//! Every section is optional and falls back to its defaults.

use crate::progress::DEFAULT_TOLERANCE_PERCENT;
use crate::validation::{is_valid_macro_goals, is_valid_number};
use crate::{Error, MacroGoals, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub goals: MacroGoals,

    #[serde(default)]
    pub progress: ProgressConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Progress display configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Band around each goal that still counts as "met", in percent
    #[serde(default = "default_tolerance_percent")]
    pub tolerance_percent: f64,

    /// Width of terminal progress bars, in characters
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tolerance_percent: default_tolerance_percent(),
            bar_width: default_bar_width(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fittrack")
}

fn default_tolerance_percent() -> f64 {
    DEFAULT_TOLERANCE_PERCENT
}

fn default_bar_width() -> f64 {
    30.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fittrack")
            .join("config.toml")
    }

    /// Reject goals or progress settings the engine can't work with
    pub fn validate(&self) -> Result<()> {
        if !is_valid_macro_goals(&self.goals) {
            return Err(Error::Config(
                "goals must all be non-negative numbers".into(),
            ));
        }
        if !is_valid_number(self.progress.tolerance_percent) {
            return Err(Error::Config(format!(
                "tolerance_percent must be >= 0, got {}",
                self.progress.tolerance_percent
            )));
        }
        if !is_valid_number(self.progress.bar_width) || !self.progress.bar_width.is_finite() {
            return Err(Error::Config(format!(
                "bar_width must be a finite number >= 0, got {}",
                self.progress.bar_width
            )));
        }
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
