//! Configuration module

pub mod loader;

pub use loader::{Config, CONFIG_FILENAME, DEFAULT_RULES_PATH};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

fn default_true() -> bool {
    true
}

/// External linter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinterConfig {
    /// Whether to run the linter at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Program name or path
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before the playbook path
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Upper bound on the linter run, in seconds (no bound when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// How the linter's own exit code affects the run's exit code
    #[serde(default)]
    pub exit_policy: ExitPolicy,

    /// Environment variables set for the linter process
    #[serde(default = "default_env")]
    pub env: BTreeMap<String, String>,
}

fn default_program() -> String {
    "ansible-lint".to_string()
}

fn default_args() -> Vec<String> {
    vec!["--format".to_string(), "json".to_string()]
}

fn default_env() -> BTreeMap<String, String> {
    ["LANG", "LC_ALL"]
        .into_iter()
        .map(|key| (key.to_string(), "en_US.UTF-8".to_string()))
        .collect()
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: default_program(),
            args: default_args(),
            timeout_secs: None,
            exit_policy: ExitPolicy::default(),
            env: default_env(),
        }
    }
}

impl LinterConfig {
    /// Bounded wait, if configured. Zero means unbounded.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Whether a nonzero linter exit code fails the run on its own
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExitPolicy {
    /// Fail only on findings or when the linter could not be executed
    #[default]
    Lenient,
    /// Also fail when the linter ran and exited nonzero, even without findings
    Strict,
}

impl fmt::Display for ExitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lenient => write!(f, "lenient"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Validate the report against the report JSON Schema before writing
    #[serde(default)]
    pub validate: bool,
}
