//! Terminal summary with colors

use colored::Colorize;
use std::time::Duration;

use crate::config::ExitPolicy;
use crate::engine::RunOutcome;
use crate::linter::LinterStatus;
use crate::report::ReportStatus;
use crate::rules::Finding;

/// Renders the end-of-run summary printed after `check`
pub struct TerminalOutput {
    policy: ExitPolicy,
}

impl TerminalOutput {
    pub fn new(policy: ExitPolicy) -> Self {
        Self { policy }
    }

    /// Full summary for a completed run
    pub fn render(&self, outcome: &RunOutcome, output_path: &str) -> String {
        let mut output = self.format_header(outcome);
        output.push_str(&self.format_issues(outcome.report.issues()));
        output.push_str(&self.format_summary(outcome, output_path));
        output
    }

    fn format_header(&self, outcome: &RunOutcome) -> String {
        format!(
            "\n{} v{}\n\n{} {}\n{} {}\n",
            "playbook-qa".cyan().bold(),
            env!("CARGO_PKG_VERSION"),
            "Playbook:".dimmed(),
            outcome.report.playbook_path().white().bold(),
            "Linter:".dimmed(),
            format_linter_status(outcome.linter_status)
        )
    }

    fn format_issues(&self, issues: &[Finding]) -> String {
        let mut output = format!(
            "\n{}\n{}\n\n",
            "━".repeat(50).dimmed(),
            "  ISSUES".bold()
        );

        if issues.is_empty() {
            output.push_str(&format!("  {}\n", "No issues found.".green()));
            return output;
        }

        for finding in issues {
            output.push_str(&self.format_finding(finding));
        }

        output
    }

    fn format_finding(&self, finding: &Finding) -> String {
        let location = match finding.line {
            Some(line) => format!("{}:{}", finding.file, line),
            None => finding.file.clone(),
        };

        let mut output = format!(
            "  {} [{}] {} {}\n    {} {}\n",
            "•".dimmed(),
            finding.rule_id.cyan(),
            finding.severity.yellow(),
            finding.description,
            "└─".dimmed(),
            location.dimmed()
        );

        if let Some(matched) = &finding.matched {
            output.push_str(&format!("       {}\n", matched.dimmed()));
        }

        output
    }

    fn format_summary(&self, outcome: &RunOutcome, output_path: &str) -> String {
        let status = match outcome.report.status() {
            ReportStatus::Pass => "PASS".green().bold(),
            ReportStatus::Fail => "FAIL".red().bold(),
        };

        let mut output = format!(
            "\n{}\n  {} {}  ({} from linter, {} from {} custom rules) in {}\n",
            "━".repeat(50).dimmed(),
            "Status:".bold(),
            status,
            outcome.linter_findings,
            outcome.rule_findings,
            outcome.rules_loaded,
            format_duration(outcome.duration)
        );

        for rejected in &outcome.rejected_rules {
            output.push_str(&format!(
                "  {} rule {} skipped: invalid pattern\n",
                "Warning:".yellow().bold(),
                rejected.rule_id.cyan()
            ));
        }

        if let Some(anomaly) = &outcome.anomaly {
            output.push_str(&format!(
                "  {} linter output ignored: {}\n",
                "Warning:".yellow().bold(),
                anomaly
            ));
        }

        if self.policy == ExitPolicy::Strict && outcome.linter_status.is_nonzero_exit() {
            output.push_str(&format!(
                "  {} linter exited nonzero (strict exit policy)\n",
                "Note:".yellow().bold()
            ));
        }

        output.push_str(&format!(
            "  {} {}\n",
            "Report:".dimmed(),
            output_path.cyan()
        ));

        output
    }
}

fn format_linter_status(status: LinterStatus) -> String {
    let text = status.to_string();
    if status.is_tool_failure() {
        text.red().to_string()
    } else if status.is_nonzero_exit() {
        text.yellow().to_string()
    } else {
        text.green().to_string()
    }
}

/// Format a duration as "< 1ms", "456ms" or "1.23s"
pub fn format_duration(duration: Duration) -> String {
    match duration.as_millis() {
        0 => "< 1ms".to_string(),
        millis if millis >= 1000 => format!("{:.2}s", duration.as_secs_f64()),
        millis => format!("{}ms", millis),
    }
}
