//! # CLI Module
//!
//! This module defines the command-line interface for playbook-qa using `clap`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `check` | Lint a playbook and apply custom rules, write the JSON report |
//! | `init` | Write a starter configuration and rules file |
//! | `schema` | Display the JSON Schema of the report |
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level (use multiple times: -v, -vv, -vvv)
//! - `-c, --config <FILE>` - Path to configuration file
//! - `--log-file <FILE>` - Also write logs to a file
//!
//! ## Examples
//!
//! ```bash
//! playbook-qa init
//! playbook-qa check --playbook-file site.yml -o reports/site.json
//! playbook-qa check -p site.yml -o qa.json --rules qa/rules.json --exit-policy strict
//! ```

pub mod commands;
pub mod exit_codes;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{CheckArgs, InitArgs, SchemaArgs};

/// playbook-qa - Run ansible-lint and custom rules against Ansible playbooks
#[derive(Parser, Debug)]
#[command(name = "playbook-qa")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file (defaults to ./.playbook-qa.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the linter and custom rules against a playbook and write a report
    Check(CheckArgs),

    /// Write a starter configuration and rules file
    Init(InitArgs),

    /// Display the JSON Schema for the report
    Schema(SchemaArgs),
}
