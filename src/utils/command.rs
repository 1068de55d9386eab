//! Command execution utilities
//!
//! Runs an external program to completion and captures its output, with an
//! optional bounded wait. Launch failures are reported through
//! [`CommandError`] so callers can tell a missing executable apart from other
//! I/O problems.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Result of a command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code of the command, `None` when terminated by a signal
    pub exit_code: Option<i32>,
    /// Standard output (stdout)
    pub stdout: String,
    /// Standard error (stderr)
    pub stderr: String,
}

/// Reasons a command could not produce a [`CommandResult`]
#[derive(Error, Debug)]
pub enum CommandError {
    /// The executable could not be located
    #[error("'{program}' command not found. Please ensure it is installed and in your PATH.")]
    NotFound {
        /// Program that was looked up
        program: String,
    },

    /// Spawning or waiting on the process failed
    #[error("An unexpected error occurred while running '{program}': {source}")]
    Io {
        /// Program that was run
        program: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The process did not finish within the allowed time and was killed
    #[error("'{program}' did not finish within {}s", .timeout.as_secs())]
    TimedOut {
        /// Program that was run
        program: String,
        /// The bound that elapsed
        timeout: Duration,
    },
}

/// A program invocation
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    /// Program name or path
    pub program: String,
    /// Arguments passed to the program
    pub args: Vec<String>,
    /// Environment variables set on top of the inherited environment
    pub env: BTreeMap<String, String>,
    /// Optional bound on the wait
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    /// Create a spec for `program` with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Bound the wait
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Resolve `program` to an executable path.
///
/// Names are searched on `PATH`; anything containing a path separator is
/// checked as given. An explicit path that exists but is not executable is
/// passed through so the spawn reports it as an I/O failure.
pub fn resolve_program(program: &str) -> Result<PathBuf, CommandError> {
    match which::which(program) {
        Ok(path) => Ok(path),
        Err(_) if is_explicit_path(program) && Path::new(program).exists() => {
            Ok(PathBuf::from(program))
        }
        Err(_) => Err(CommandError::NotFound {
            program: program.to_string(),
        }),
    }
}

fn is_explicit_path(program: &str) -> bool {
    Path::new(program)
        .parent()
        .is_some_and(|parent| !parent.as_os_str().is_empty())
}

/// Execute a command and capture its output.
///
/// Output is decoded lossily as UTF-8 and left untrimmed.
pub async fn execute_command(spec: &CommandSpec) -> Result<CommandResult, CommandError> {
    let executable = resolve_program(&spec.program)?;

    let mut cmd = Command::new(&executable);
    cmd.args(&spec.args)
        .envs(&spec.env)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    let io_error = |source: std::io::Error| match source.kind() {
        ErrorKind::NotFound => CommandError::NotFound {
            program: spec.program.clone(),
        },
        _ => CommandError::Io {
            program: spec.program.clone(),
            source,
        },
    };

    // `output()` owns the child; dropping the future on timeout kills it.
    let output = match spec.timeout {
        Some(limit) => tokio::time::timeout(limit, cmd.output())
            .await
            .map_err(|_| CommandError::TimedOut {
                program: spec.program.clone(),
                timeout: limit,
            })?
            .map_err(io_error)?,
        None => cmd.output().await.map_err(io_error)?,
    };

    Ok(CommandResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_command_success() {
        let result = execute_command(&CommandSpec::new("echo").arg("hello"))
            .await
            .unwrap();
        assert_eq!(result.stdout.trim(), "hello");
        assert_eq!(result.exit_code, Some(0));
    }

    #[tokio::test]
    async fn test_execute_command_failure() {
        let result = execute_command(&CommandSpec::new("false")).await.unwrap();
        assert_eq!(result.exit_code, Some(1));
    }

    #[tokio::test]
    async fn test_execute_command_not_found() {
        let result = execute_command(&CommandSpec::new("nonexistent_command_xyz")).await;
        assert!(matches!(result, Err(CommandError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_execute_command_passes_env() {
        let spec = CommandSpec::new("sh")
            .args(["-c", "printf %s \"$PLAYBOOK_QA_TEST\""])
            .env("PLAYBOOK_QA_TEST", "en_US.UTF-8");

        let result = execute_command(&spec).await.unwrap();

        assert_eq!(result.stdout, "en_US.UTF-8");
    }

    #[tokio::test]
    async fn test_execute_command_captures_stderr() {
        let spec = CommandSpec::new("sh").args(["-c", "echo oops >&2; exit 4"]);

        let result = execute_command(&spec).await.unwrap();

        assert_eq!(result.exit_code, Some(4));
        assert_eq!(result.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_execute_command_timeout() {
        let spec = CommandSpec::new("sleep")
            .arg("5")
            .timeout(Some(Duration::from_millis(100)));

        let result = execute_command(&spec).await;

        assert!(matches!(result, Err(CommandError::TimedOut { .. })));
    }

    #[tokio::test]
    async fn test_non_executable_path_is_an_io_failure() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let script = temp_dir.path().join("lint");
        std::fs::write(&script, "#!/bin/sh\necho '[]'\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o644)).unwrap();

        let result = execute_command(&CommandSpec::new(script.display().to_string())).await;

        assert!(matches!(result, Err(CommandError::Io { .. })), "{:?}", result);
    }

    #[test]
    fn test_missing_explicit_path_is_not_found() {
        let result = resolve_program("/nonexistent/dir/ansible-lint");
        assert!(matches!(result, Err(CommandError::NotFound { .. })));
    }
}
