//! playbook-qa - QA checks for Ansible playbooks
//!
//! This is the main entry point for the CLI application.

use clap::Parser;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use playbook_qa::cli::{self, Cli, Commands};
use playbook_qa::exit_codes;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    if let Err(e) = setup_logging(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("Error: failed to open log file: {}", e);
        std::process::exit(exit_codes::ERROR);
    }

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Check(args) => cli::commands::check::execute(args, cli.config.as_deref())
            .await
            .map_err(anyhow::Error::from),
        Commands::Init(args) => cli::commands::init::execute(args).await,
        Commands::Schema(args) => cli::commands::schema::execute(args)
            .await
            .map_err(anyhow::Error::from),
    };

    // Handle exit codes for CI integration
    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            tracing::error!(error = %e, "Run aborted");
            eprintln!("Error: {:#}", e);
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn setup_logging(verbosity: u8, log_file: Option<&Path>) -> io::Result<()> {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = File::options().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    Ok(())
}
