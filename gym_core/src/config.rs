//! Configuration file support for GymTrack.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/gymtrack/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub session: SessionDefaults,
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

/// Session defaults and input bounds
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionDefaults {
    /// Sets seeded onto each exercise when a workout starts
    #[serde(default = "default_sets_per_exercise")]
    pub default_sets_per_exercise: usize,

    /// Rest interval started after each completed set
    #[serde(default = "default_rest_seconds")]
    pub default_rest_seconds: u32,

    /// Weight increment used by pickers and suggestions
    #[serde(default = "default_weight_step")]
    pub weight_step: f64,

    /// Upper input bound for weight
    #[serde(default = "default_max_weight")]
    pub max_weight: f64,

    /// Upper input bound for reps
    #[serde(default = "default_max_reps")]
    pub max_reps: i32,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            default_sets_per_exercise: default_sets_per_exercise(),
            default_rest_seconds: default_rest_seconds(),
            weight_step: default_weight_step(),
            max_weight: default_max_weight(),
            max_reps: default_max_reps(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("gymtrack")
}

fn default_sets_per_exercise() -> usize {
    4
}

fn default_rest_seconds() -> u32 {
    crate::RestDuration::Ninety.seconds()
}

fn default_weight_step() -> f64 {
    2.5
}

fn default_max_weight() -> f64 {
    300.0
}

fn default_max_reps() -> i32 {
    30
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
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("gymtrack").join("config.toml")
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
