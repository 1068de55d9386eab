//! Exit codes for the CLI
//!
//! | Code | Constant | Meaning |
//! |------|----------|---------|
//! | 0 | `SUCCESS` | No issues, linter ran (or is disabled) |
//! | 1 | `FAILURE` | Issues found, or the linter could not be executed |
//! | 2 | `ERROR` | Fatal error: rules file, playbook, or report write |
//!
//! Command-line usage errors reported by `clap` also exit with 2.

/// No issues found and the linter did not fail.
pub const SUCCESS: i32 = 0;

/// Issues found, or the linter failed to execute.
///
/// Under the strict exit policy a nonzero linter exit code also maps here.
pub const FAILURE: i32 = 1;

/// Fatal error before or after the checks.
///
/// Used when:
/// - The custom rules file is missing or malformed
/// - The configuration file is unreadable or invalid
/// - The playbook is missing or unreadable
/// - The report could not be written
pub const ERROR: i32 = 2;
