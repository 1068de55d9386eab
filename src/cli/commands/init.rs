//! Init command - write a starter configuration and rules file

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use super::InitArgs;
use crate::cli::exit_codes;
use crate::config::{Config, CONFIG_FILENAME, DEFAULT_RULES_PATH};
use crate::rules::Rule;

/// Rules written by `init`
pub fn starter_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "QA001",
            r"become:\s*(true|yes)",
            "Avoid unconditional privilege escalation; scope become to the tasks that need it",
            "HIGH",
        ),
        Rule::new(
            "QA002",
            r"(password|secret|token)\s*:\s*['\x22]?[^\s{'\x22]",
            "Possible hardcoded credential; use Ansible Vault or a lookup",
            "HIGH",
        ),
        Rule::new(
            "QA003",
            r"validate_certs:\s*(false|no)",
            "TLS certificate validation is disabled",
            "MEDIUM",
        ),
        Rule::new(
            "QA004",
            r"ignore_errors:\s*(true|yes)",
            "Errors are ignored; prefer failed_when with an explicit condition",
            "LOW",
        ),
    ]
}

pub async fn execute(args: InitArgs) -> Result<i32> {
    execute_in(Path::new("."), args)
}

fn execute_in(dir: &Path, args: InitArgs) -> Result<i32> {
    let config_path = dir.join(CONFIG_FILENAME);
    let rules_path = dir.join(DEFAULT_RULES_PATH);

    for path in [&config_path, &rules_path] {
        if path.exists() && !args.force {
            eprintln!(
                "{} {} already exists. Use --force to overwrite.",
                "Error:".red().bold(),
                path.display()
            );
            return Ok(exit_codes::FAILURE);
        }
    }

    let config_content = Config::default()
        .to_toml()
        .context("Failed to serialize configuration")?;
    fs::write(&config_path, config_content).context("Failed to write configuration file")?;

    if let Some(parent) = rules_path.parent() {
        fs::create_dir_all(parent).context("Failed to create rules directory")?;
    }
    let rules_content =
        serde_json::to_string_pretty(&starter_rules()).context("Failed to serialize rules")?;
    fs::write(&rules_path, rules_content).context("Failed to write rules file")?;

    println!(
        "{} Created {} and {}",
        "Success:".green().bold(),
        CONFIG_FILENAME.cyan(),
        DEFAULT_RULES_PATH.cyan()
    );

    println!("\nNext steps:");
    println!("  1. Review and customize {}", DEFAULT_RULES_PATH.cyan());
    println!(
        "  2. Run {} to check a playbook",
        "playbook-qa check -p site.yml -o qa-report.json".cyan()
    );

    Ok(exit_codes::SUCCESS)
}
