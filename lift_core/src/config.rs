//! Configuration file support for liftlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftlog/config.toml`.
//! The progression section carries a default policy plus optional
//! per-program overrides, so rule variants (quantum, doubling,
//! comparator) are configuration rather than code.

use crate::error::{Error, Result};
use crate::policy::ProgressionPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub program: ProgramConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,
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

/// Program cycle configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// Sessions per training week, used for week numbering.
    #[serde(default = "default_cycle_length")]
    pub cycle_length: u32,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            cycle_length: default_cycle_length(),
        }
    }
}

/// Progression policy configuration: one default policy and optional
/// per-program overrides.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ProgressionConfig {
    #[serde(default)]
    pub default: ProgressionPolicy,

    #[serde(default)]
    pub per_program: HashMap<String, ProgressionPolicy>,
}

impl ProgressionConfig {
    /// Policy in effect for a program key.
    pub fn policy_for(&self, program_key: &str) -> &ProgressionPolicy {
        self.per_program.get(program_key).unwrap_or(&self.default)
    }
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("liftlog")
}

fn default_cycle_length() -> u32 {
    4
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

        let mut findings = config.progression.default.validate();
        for (key, policy) in &config.progression.per_program {
            for finding in policy.validate() {
                findings.push(format!("[{}] {}", key, finding));
            }
        }
        if !findings.is_empty() {
            return Err(Error::Config(findings.join("; ")));
        }

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("liftlog").join("config.toml")
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
