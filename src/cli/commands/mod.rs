//! CLI commands module

pub mod check;
pub mod init;
pub mod schema;

use clap::Args;
use std::path::PathBuf;

use crate::config::ExitPolicy;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the Ansible playbook file
    #[arg(short = 'p', long, value_name = "FILE")]
    pub playbook_file: PathBuf,

    /// Path to save the QA report JSON file
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output_report: PathBuf,

    /// Path to the custom rules JSON file
    #[arg(short, long, env = "PLAYBOOK_QA_RULES", value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Linter program to run instead of the configured one
    #[arg(long, value_name = "PROGRAM")]
    pub linter: Option<String>,

    /// Do not run the external linter
    #[arg(long)]
    pub skip_lint: bool,

    /// Whether a nonzero linter exit code alone fails the run
    #[arg(long, value_enum, value_name = "POLICY")]
    pub exit_policy: Option<ExitPolicy>,

    /// Maximum time to wait for the linter, in seconds (0 = no limit)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Validate the report against the JSON Schema before writing it
    #[arg(long)]
    pub validate: bool,

    /// Do not print the summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the schema command
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}
