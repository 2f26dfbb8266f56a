//! Configuration file support for fitlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fitlog/config.toml`.

use crate::calendar::MAX_WINDOW_DAYS;
use crate::estimator::{EnergyModel, DEFAULT_FATIGUE_ALPHA};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub graph: GraphConfig,

    #[serde(default)]
    pub history: HistoryConfig,
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

/// Energy model parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_fatigue_alpha")]
    pub fatigue_alpha: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            fatigue_alpha: default_fatigue_alpha(),
        }
    }
}

/// Graph window sizes, in days
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_day_window_days")]
    pub day_window_days: u32,

    #[serde(default = "default_detail_window_days")]
    pub detail_window_days: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            day_window_days: default_day_window_days(),
            detail_window_days: default_detail_window_days(),
        }
    }
}

/// How far back days can be viewed and edited
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_max_days_back")]
    pub max_days_back: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_days_back: default_max_days_back(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("fitlog")
}

fn default_fatigue_alpha() -> f64 {
    DEFAULT_FATIGUE_ALPHA
}

fn default_day_window_days() -> u32 {
    7
}

fn default_detail_window_days() -> u32 {
    30
}

fn default_max_days_back() -> u32 {
    5
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

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("fitlog").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
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

    pub fn validate(&self) -> Result<()> {
        let alpha = self.model.fatigue_alpha;
        if !(alpha.is_finite() && alpha >= 0.0) {
            return Err(Error::Config(format!(
                "fatigue_alpha must be a non-negative number, got {}",
                alpha
            )));
        }
        for (name, days) in [
            ("day_window_days", self.graph.day_window_days),
            ("detail_window_days", self.graph.detail_window_days),
        ] {
            if days == 0 || days > MAX_WINDOW_DAYS {
                return Err(Error::Config(format!(
                    "{} must be between 1 and {}, got {}",
                    name, MAX_WINDOW_DAYS, days
                )));
            }
        }
        if self.history.max_days_back >= MAX_WINDOW_DAYS {
            return Err(Error::Config(format!(
                "max_days_back must be below {}, got {}",
                MAX_WINDOW_DAYS, self.history.max_days_back
            )));
        }
        Ok(())
    }

    pub fn energy_model(&self) -> EnergyModel {
        EnergyModel {
            fatigue_alpha: self.model.fatigue_alpha,
        }
    }

    pub fn records_path(&self) -> PathBuf {
        self.data.data_dir.join("records.json")
    }

    pub fn profile_path(&self) -> PathBuf {
        self.data.data_dir.join("profile.json")
    }
}
