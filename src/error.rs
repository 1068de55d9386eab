//! Error types for playbook-qa
//!
//! This module defines the fatal error taxonomy using `thiserror`. Non-fatal
//! anomalies (linter unavailable, unparseable linter output, invalid rule
//! patterns) are not errors: they are carried as values by the components
//! that produce them, see [`crate::linter::LinterStatus`],
//! [`crate::linter::ParseAnomaly`] and [`crate::rules::PatternError`].

use thiserror::Error;

/// Main error type for playbook-qa
#[derive(Error, Debug)]
pub enum QaError {
    /// Rules file or configuration file problems
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Playbook problems
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Report could not be persisted
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Errors raised while loading the custom rules file or the tool configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The rules file does not exist
    #[error("Custom rules file not found at '{path}'")]
    RulesNotFound {
        /// Path that was looked up
        path: String,
    },

    /// The rules file exists but could not be read
    #[error("Failed to read rules file '{path}': {source}")]
    RulesRead {
        /// Path to the rules file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The rules file is not valid JSON
    #[error("Could not decode JSON from '{path}': {source}")]
    RulesParse {
        /// Path to the rules file
        path: String,
        /// The underlying JSON error
        source: serde_json::Error,
    },

    /// The rules file top-level value is not an array
    #[error("Rules file '{path}' should contain a JSON list, found {found}")]
    RulesNotList {
        /// Path to the rules file
        path: String,
        /// Kind of JSON value that was found instead
        found: &'static str,
    },

    /// A rule entry is malformed
    #[error("Invalid rule at index {index} in '{path}': {reason}")]
    InvalidRule {
        /// Path to the rules file
        path: String,
        /// Zero-based position of the rule in the list
        index: usize,
        /// What is wrong with the entry
        reason: String,
    },

    /// The configuration file could not be read
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        /// Path to the configuration file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for our schema
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        /// Path to the configuration file
        path: String,
        /// The underlying TOML error
        source: toml::de::Error,
    },
}

/// Errors about the playbook under analysis
#[derive(Error, Debug)]
pub enum InputError {
    /// The playbook file does not exist
    #[error("Playbook file not found: {path}")]
    PlaybookNotFound {
        /// Path to the playbook
        path: String,
    },

    /// The playbook exists but could not be read as text
    #[error("Failed to read playbook '{path}': {source}")]
    PlaybookRead {
        /// Path to the playbook
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

/// Errors raised while persisting the QA report
#[derive(Error, Debug)]
pub enum ReportError {
    /// The parent directory of the report could not be created
    #[error("Failed to create report directory '{path}': {source}")]
    CreateDir {
        /// Directory that could not be created
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The report file could not be written
    #[error("Failed to write report file '{path}': {source}")]
    Write {
        /// Path to the report file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The report file could not be read back
    #[error("Failed to read report file '{path}': {source}")]
    Read {
        /// Path to the report file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// JSON serialization or deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The report does not conform to the report JSON Schema
    #[error("Report does not match the report schema: {}", .errors.join("; "))]
    Validation {
        /// Individual validation messages
        errors: Vec<String>,
    },
}
