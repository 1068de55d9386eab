//! Check command - lint a playbook, apply custom rules, write the report

use std::path::Path;
use tracing::info;

use super::CheckArgs;
use crate::cli::output::TerminalOutput;
use crate::config::Config;
use crate::engine::{QaEngine, RunRequest};
use crate::error::QaError;
use crate::linter::AnsibleLint;

pub async fn execute(args: CheckArgs, config_path: Option<&Path>) -> Result<i32, QaError> {
    let config = match config_path {
        Some(path) => Config::load_from_file(path)?,
        None => Config::discover(Path::new("."))?,
    };
    let config = apply_overrides(config, &args);

    let engine = if config.linter.enabled {
        QaEngine::new(Box::new(AnsibleLint::new(config.linter.clone())))
    } else {
        QaEngine::without_linter()
    };

    let request = RunRequest {
        playbook: args.playbook_file.clone(),
        rules_path: config.rules_path.clone(),
        output: args.output_report.clone(),
        validate: config.report.validate,
    };

    let outcome = engine.run(&request).await?;
    let exit_code = outcome.exit_code(config.linter.exit_policy);

    if !args.quiet {
        let output_path = request.output.display().to_string();
        println!(
            "{}",
            TerminalOutput::new(config.linter.exit_policy).render(&outcome, &output_path)
        );
    }

    info!(exit_code, "QA checks finished");
    Ok(exit_code)
}

/// Layer command-line flags over the file configuration
fn apply_overrides(mut config: Config, args: &CheckArgs) -> Config {
    if let Some(rules) = &args.rules {
        config.rules_path = rules.clone();
    }
    if let Some(program) = &args.linter {
        config.linter.program = program.clone();
    }
    if args.skip_lint {
        config.linter.enabled = false;
    }
    if let Some(policy) = args.exit_policy {
        config.linter.exit_policy = policy;
    }
    if let Some(timeout) = args.timeout {
        config.linter.timeout_secs = Some(timeout);
    }
    if args.validate {
        config.report.validate = true;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExitPolicy, DEFAULT_RULES_PATH};
    use std::path::PathBuf;

    fn args() -> CheckArgs {
        CheckArgs {
            playbook_file: PathBuf::from("site.yml"),
            output_report: PathBuf::from("qa.json"),
            rules: None,
            linter: None,
            skip_lint: false,
            exit_policy: None,
            timeout: None,
            validate: false,
            quiet: true,
        }
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let config = apply_overrides(Config::default(), &args());

        assert_eq!(config, Config::default());
        assert_eq!(config.rules_path, PathBuf::from(DEFAULT_RULES_PATH));
    }

    #[test]
    fn test_flags_override_config() {
        let mut file_config = Config::default();
        file_config.rules_path = PathBuf::from("from-file.json");
        file_config.linter.exit_policy = ExitPolicy::Lenient;

        let config = apply_overrides(
            file_config,
            &CheckArgs {
                rules: Some(PathBuf::from("from-cli.json")),
                linter: Some("/usr/local/bin/ansible-lint".to_string()),
                skip_lint: true,
                exit_policy: Some(ExitPolicy::Strict),
                timeout: Some(60),
                validate: true,
                ..args()
            },
        );

        assert_eq!(config.rules_path, PathBuf::from("from-cli.json"));
        assert_eq!(config.linter.program, "/usr/local/bin/ansible-lint");
        assert!(!config.linter.enabled);
        assert_eq!(config.linter.exit_policy, ExitPolicy::Strict);
        assert_eq!(config.linter.timeout_secs, Some(60));
        assert!(config.report.validate);
    }

    #[test]
    fn test_file_values_survive_when_flags_absent() {
        let mut file_config = Config::default();
        file_config.rules_path = PathBuf::from("from-file.json");
        file_config.linter.timeout_secs = Some(10);

        let config = apply_overrides(file_config, &args());

        assert_eq!(config.rules_path, PathBuf::from("from-file.json"));
        assert_eq!(config.linter.timeout_secs, Some(10));
    }
}
