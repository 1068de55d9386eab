//! Configuration loader

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;

use super::{LinterConfig, ReportConfig};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILENAME: &str = ".playbook-qa.toml";

/// Rules file used when neither the command line nor the config names one
pub const DEFAULT_RULES_PATH: &str = "rules/custom_qa_rules.json";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the custom rules file
    #[serde(default = "default_rules_path")]
    pub rules_path: PathBuf,

    /// External linter settings
    #[serde(default)]
    pub linter: LinterConfig,

    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_rules_path() -> PathBuf {
    PathBuf::from(DEFAULT_RULES_PATH)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_path: default_rules_path(),
            linter: LinterConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Config {
    /// Load `.playbook-qa.toml` from `dir`, or return the defaults when absent
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILENAME);

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            debug!(dir = %dir.display(), "No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        let config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;

        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
