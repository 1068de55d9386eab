//! # Linter Adapter
//!
//! Runs the external linter (`ansible-lint` by default) against a playbook
//! and turns its output into [`Finding`](crate::rules::Finding)s.
//!
//! Invocation never fails: problems launching the linter are folded into
//! the returned [`LintInvocation`] as negative sentinel exit statuses, so the
//! rest of the pipeline keeps running with the custom rule results alone.
//!
//! | Exit status | [`LinterStatus`] | Meaning |
//! |-------------|------------------|---------|
//! | `0` | `Clean` | linter reported no issues |
//! | `2` | `LocaleFailure` | known environment/locale class of failure |
//! | other `> 0` | `Exited` | issues found or other linter failure |
//! | `-1` | `NotFound` | executable could not be located |
//! | `-2` | `SpawnFailed` | any other launch or wait failure |
//! | `-3` | `TimedOut` | bounded wait elapsed, process killed |

pub mod normalize;

pub use normalize::{normalize, Normalized, OutputShape, ParseAnomaly, RecordLayout};

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::config::LinterConfig;
use crate::utils::command::{execute_command, CommandError, CommandSpec};

/// Sentinel exit status: the linter executable could not be located
pub const EXIT_NOT_FOUND: i32 = -1;
/// Sentinel exit status: any other invocation failure
pub const EXIT_SPAWN_FAILED: i32 = -2;
/// Sentinel exit status: the bounded wait elapsed
pub const EXIT_TIMED_OUT: i32 = -3;

/// Raw result of one linter invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintInvocation {
    /// Captured standard output; absent when the process never ran
    pub stdout: Option<String>,
    /// Captured standard error, or an error message for sentinel statuses
    pub stderr: String,
    /// Process exit status, or one of the negative sentinels
    pub exit_status: i32,
}

impl LintInvocation {
    /// Invocation that failed before producing any output
    pub fn failed(exit_status: i32, message: impl Into<String>) -> Self {
        Self {
            stdout: None,
            stderr: message.into(),
            exit_status,
        }
    }

    /// Classify the exit status
    pub fn status(&self) -> LinterStatus {
        LinterStatus::classify(self.exit_status)
    }
}

/// Classified outcome of a linter run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinterStatus {
    /// Linter not run because it is disabled in the configuration
    Disabled,
    /// Exit status 0
    Clean,
    /// Exit status 2, usually a locale problem in the linter's environment
    LocaleFailure,
    /// Any other non-negative exit status
    Exited(i32),
    /// Executable not found
    NotFound,
    /// Launch or wait failure
    SpawnFailed,
    /// Bounded wait elapsed
    TimedOut,
}

impl LinterStatus {
    /// Map an exit status (including sentinels) to a status
    pub fn classify(exit_status: i32) -> Self {
        match exit_status {
            0 => Self::Clean,
            2 => Self::LocaleFailure,
            EXIT_NOT_FOUND => Self::NotFound,
            EXIT_TIMED_OUT => Self::TimedOut,
            code if code < 0 => Self::SpawnFailed,
            code => Self::Exited(code),
        }
    }

    /// The linter could not be executed at all
    pub fn is_tool_failure(&self) -> bool {
        matches!(self, Self::NotFound | Self::SpawnFailed | Self::TimedOut)
    }

    /// The linter ran and exited with a nonzero code
    pub fn is_nonzero_exit(&self) -> bool {
        matches!(self, Self::LocaleFailure | Self::Exited(_))
    }
}

impl fmt::Display for LinterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::Clean => write!(f, "clean (exit 0)"),
            Self::LocaleFailure => write!(f, "locale failure (exit 2)"),
            Self::Exited(code) => write!(f, "exited with code {}", code),
            Self::NotFound => write!(f, "not found"),
            Self::SpawnFailed => write!(f, "failed to execute"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Something that can lint a playbook
#[async_trait]
pub trait LintRunner: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Run the linter against `playbook` and wait for it to finish
    async fn invoke(&self, playbook: &Path) -> LintInvocation;
}

/// Runs `ansible-lint` (or a compatible program) as a subprocess
pub struct AnsibleLint {
    config: LinterConfig,
}

impl AnsibleLint {
    /// Create a runner from the linter configuration
    pub fn new(config: LinterConfig) -> Self {
        Self { config }
    }

    /// Command line that will be executed for `playbook`
    pub fn command_for(&self, playbook: &Path) -> CommandSpec {
        let mut spec = CommandSpec::new(self.config.program.as_str())
            .args(self.config.args.iter().cloned())
            .arg(playbook.display().to_string())
            .timeout(self.config.timeout());

        for (key, value) in &self.config.env {
            spec = spec.env(key.as_str(), value.as_str());
        }

        spec
    }
}

#[async_trait]
impl LintRunner for AnsibleLint {
    fn name(&self) -> &str {
        &self.config.program
    }

    async fn invoke(&self, playbook: &Path) -> LintInvocation {
        let spec = self.command_for(playbook);
        debug!(program = %spec.program, args = ?spec.args, "Running linter");

        match execute_command(&spec).await {
            Ok(result) => LintInvocation {
                stdout: Some(result.stdout),
                stderr: result.stderr,
                exit_status: result.exit_code.unwrap_or(EXIT_SPAWN_FAILED),
            },
            Err(e) => {
                let exit_status = match e {
                    CommandError::NotFound { .. } => EXIT_NOT_FOUND,
                    CommandError::TimedOut { .. } => EXIT_TIMED_OUT,
                    CommandError::Io { .. } => EXIT_SPAWN_FAILED,
                };
                LintInvocation::failed(exit_status, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_classify_exit_statuses() {
        assert_eq!(LinterStatus::classify(0), LinterStatus::Clean);
        assert_eq!(LinterStatus::classify(2), LinterStatus::LocaleFailure);
        assert_eq!(LinterStatus::classify(1), LinterStatus::Exited(1));
        assert_eq!(LinterStatus::classify(8), LinterStatus::Exited(8));
        assert_eq!(LinterStatus::classify(-1), LinterStatus::NotFound);
        assert_eq!(LinterStatus::classify(-2), LinterStatus::SpawnFailed);
        assert_eq!(LinterStatus::classify(-3), LinterStatus::TimedOut);
        assert_eq!(LinterStatus::classify(-9), LinterStatus::SpawnFailed);
    }

    #[test]
    fn test_sentinels_are_distinct_and_negative() {
        let sentinels = [EXIT_NOT_FOUND, EXIT_SPAWN_FAILED, EXIT_TIMED_OUT];
        for (i, a) in sentinels.iter().enumerate() {
            assert!(*a < 0);
            for b in &sentinels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_status_predicates() {
        assert!(LinterStatus::NotFound.is_tool_failure());
        assert!(LinterStatus::TimedOut.is_tool_failure());
        assert!(!LinterStatus::Exited(1).is_tool_failure());
        assert!(!LinterStatus::Disabled.is_tool_failure());

        assert!(LinterStatus::Exited(1).is_nonzero_exit());
        assert!(LinterStatus::LocaleFailure.is_nonzero_exit());
        assert!(!LinterStatus::Clean.is_nonzero_exit());
        assert!(!LinterStatus::NotFound.is_nonzero_exit());
    }

    #[test]
    fn test_command_for_appends_playbook_last() {
        let runner = AnsibleLint::new(LinterConfig::default());

        let spec = runner.command_for(&PathBuf::from("site.yml"));

        assert_eq!(spec.program, "ansible-lint");
        assert_eq!(spec.args, vec!["--format", "json", "site.yml"]);
        assert_eq!(
            spec.env.get("LC_ALL").map(String::as_str),
            Some("en_US.UTF-8")
        );
    }

    #[tokio::test]
    async fn test_missing_executable_yields_not_found_sentinel() {
        let runner = AnsibleLint::new(LinterConfig {
            program: "definitely-not-a-linter-xyz".to_string(),
            ..Default::default()
        });

        let invocation = runner.invoke(&PathBuf::from("site.yml")).await;

        assert_eq!(invocation.exit_status, EXIT_NOT_FOUND);
        assert_eq!(invocation.status(), LinterStatus::NotFound);
        assert!(invocation.stdout.is_none());
        assert!(invocation.stderr.contains("not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invoke_captures_output_and_exit_code() {
        let runner = AnsibleLint::new(LinterConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "echo '[]'; exit 2".to_string()],
            ..Default::default()
        });

        let invocation = runner.invoke(&PathBuf::from("site.yml")).await;

        assert_eq!(invocation.exit_status, 2);
        assert_eq!(invocation.stdout.as_deref().map(str::trim), Some("[]"));
    }
}
