//! QA pipeline
//!
//! Runs the whole check for one playbook: preconditions, external linter,
//! custom rule scan, report assembly and write. Fatal problems (rules file,
//! playbook, report write) abort with a [`QaError`]; everything else is
//! absorbed and recorded in the [`RunOutcome`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::config::ExitPolicy;
use crate::error::{InputError, QaError};
use crate::exit_codes;
use crate::linter::{self, LintInvocation, LintRunner, LinterStatus, ParseAnomaly};
use crate::report::{self, Report};
use crate::rules::{store, Finding, PatternError, PatternScanner};

/// Everything one run needs to know
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Playbook to check
    pub playbook: PathBuf,
    /// Custom rules file
    pub rules_path: PathBuf,
    /// Where to write the report
    pub output: PathBuf,
    /// Validate the report against the schema before writing
    pub validate: bool,
}

/// What happened during a run
#[derive(Debug)]
pub struct RunOutcome {
    /// The report that was written
    pub report: Report,
    /// Outcome of the linter invocation
    pub linter_status: LinterStatus,
    /// Set when linter output was present but unusable
    pub anomaly: Option<ParseAnomaly>,
    /// Number of findings contributed by the linter
    pub linter_findings: usize,
    /// Number of findings contributed by custom rules
    pub rule_findings: usize,
    /// Number of custom rules loaded
    pub rules_loaded: usize,
    /// Custom rules skipped because of an invalid pattern
    pub rejected_rules: Vec<PatternError>,
    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl RunOutcome {
    /// Process exit code for this outcome under `policy`
    pub fn exit_code(&self, policy: ExitPolicy) -> i32 {
        exit_code_for(self.report.issues().len(), self.linter_status, policy)
    }
}

/// Decide the exit code from the issue count and the linter status.
///
/// Issues and linter execution failures always fail the run. Under
/// [`ExitPolicy::Strict`] a linter that ran but exited nonzero fails it too.
pub fn exit_code_for(issue_count: usize, status: LinterStatus, policy: ExitPolicy) -> i32 {
    let failed = issue_count > 0
        || status.is_tool_failure()
        || (policy == ExitPolicy::Strict && status.is_nonzero_exit());

    if failed {
        exit_codes::FAILURE
    } else {
        exit_codes::SUCCESS
    }
}

/// Runs the pipeline with a given linter
pub struct QaEngine {
    linter: Option<Box<dyn LintRunner>>,
}

impl QaEngine {
    /// Engine that runs `linter`
    pub fn new(linter: Box<dyn LintRunner>) -> Self {
        Self {
            linter: Some(linter),
        }
    }

    /// Engine with the linter switched off
    pub fn without_linter() -> Self {
        Self { linter: None }
    }

    /// Run the pipeline for `request`
    pub async fn run(&self, request: &RunRequest) -> Result<RunOutcome, QaError> {
        let span = info_span!("check", playbook = %request.playbook.display());
        self.run_checks(request).instrument(span).await
    }

    async fn run_checks(&self, request: &RunRequest) -> Result<RunOutcome, QaError> {
        let started = Instant::now();
        let playbook_display = request.playbook.display().to_string();

        info!(
            rules = %request.rules_path.display(),
            output = %request.output.display(),
            "Starting QA checks"
        );

        if !request.playbook.exists() {
            error!("Playbook file not found");
            return Err(InputError::PlaybookNotFound {
                path: playbook_display,
            }
            .into());
        }

        let rules = store::load(&request.rules_path)?;
        let content = read_playbook(&request.playbook)?;

        let (linter_status, normalized) = match &self.linter {
            Some(runner) => {
                let invocation = runner.invoke(&request.playbook).await;
                log_invocation(runner.name(), &invocation);
                // Output is parsed whatever the exit code; the linter emits
                // JSON alongside nonzero codes.
                let normalized =
                    linter::normalize(invocation.stdout.as_deref(), &playbook_display);
                (invocation.status(), normalized)
            }
            None => {
                info!("Linter disabled, skipping");
                (LinterStatus::Disabled, linter::Normalized::default())
            }
        };
        info!(count = normalized.findings.len(), "Issues from linter");

        let scanner = PatternScanner::new(&rules);
        let rule_findings = scanner.scan(&content, &playbook_display);
        info!(count = rule_findings.len(), "Issues from custom rules");

        let linter_findings = normalized.findings.len();
        let rule_count = rule_findings.len();
        let issues: Vec<Finding> = normalized.findings.into_iter().chain(rule_findings).collect();
        info!(total = issues.len(), "Total issues found");

        let report = Report::assemble(playbook_display, issues);
        if request.validate {
            report::validate(&report)?;
            debug!("Report matches schema");
        }
        report::write(&report, &request.output)?;

        Ok(RunOutcome {
            report,
            linter_status,
            anomaly: normalized.anomaly,
            linter_findings,
            rule_findings: rule_count,
            rules_loaded: rules.len(),
            rejected_rules: scanner.rejected().to_vec(),
            duration: started.elapsed(),
        })
    }
}

fn read_playbook(path: &Path) -> Result<String, InputError> {
    let content = fs::read_to_string(path).map_err(|e| InputError::PlaybookRead {
        path: path.display().to_string(),
        source: e,
    })?;
    debug!(bytes = content.len(), "Read playbook content");
    Ok(content)
}

fn log_invocation(name: &str, invocation: &LintInvocation) {
    match invocation.status() {
        LinterStatus::Clean => info!(linter = name, "Linter completed successfully"),
        LinterStatus::LocaleFailure => {
            warn!(linter = name, "Linter finished with exit code 2 (likely locale issue)");
            debug!(stderr = %invocation.stderr, "Linter stderr");
        }
        LinterStatus::NotFound => {
            error!(linter = name, "Linter command not found, skipping linting")
        }
        LinterStatus::SpawnFailed | LinterStatus::TimedOut => error!(
            linter = name,
            code = invocation.exit_status,
            error = %invocation.stderr,
            "Linter execution failed, skipping linting"
        ),
        LinterStatus::Exited(code) => {
            warn!(linter = name, code, "Linter finished with nonzero exit code");
            debug!(stderr = %invocation.stderr, "Linter stderr");
        }
        LinterStatus::Disabled => {}
    }
}
