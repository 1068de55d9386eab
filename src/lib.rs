//! playbook-qa Library
//!
//! Quality checks for Ansible playbooks: runs `ansible-lint`, applies
//! user-defined regex rules, merges both result sets and writes a JSON
//! report.
//!
//! The pipeline is made of four parts, each usable on its own:
//!
//! - [`rules::store`] loads and validates the custom rules file
//! - [`linter`] runs the external linter and normalizes its output
//! - [`rules::scanner`] applies the custom rules line by line
//! - [`report`] assembles and writes the report
//!
//! [`engine::QaEngine`] wires them together.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod linter;
pub mod report;
pub mod rules;
pub mod utils;

pub use cli::exit_codes;
pub use error::QaError;
