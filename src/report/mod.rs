//! # Report Assembler
//!
//! Builds the QA [`Report`] from merged findings and persists it as JSON.
//!
//! The written document always has this shape, in this key order:
//!
//! ```json
//! {
//!     "report_timestamp": "2025-01-01T12:00:00.000000Z",
//!     "playbook_path": "site.yml",
//!     "status": "FAIL",
//!     "issues": [
//!         {"rule_id": "R1", "severity": "HIGH", "description": "...", "file": "site.yml", "line": 5, "match": "become: true"}
//!     ]
//! }
//! ```

pub mod schema;

pub use schema::{validate, REPORT_SCHEMA};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::ReportError;
use crate::rules::Finding;

/// Overall verdict of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportStatus {
    /// No issues
    Pass,
    /// At least one issue
    Fail,
}

impl ReportStatus {
    /// Status implied by an issue list
    pub fn for_issues(issues: &[Finding]) -> Self {
        if issues.is_empty() {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// The QA report for one playbook.
///
/// `status` is derived from `issues` and cannot be set independently; a
/// report read back from disk recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredReport")]
pub struct Report {
    #[serde(serialize_with = "serialize_timestamp")]
    report_timestamp: DateTime<Utc>,
    playbook_path: String,
    status: ReportStatus,
    issues: Vec<Finding>,
}

#[derive(Deserialize)]
struct StoredReport {
    report_timestamp: DateTime<Utc>,
    playbook_path: String,
    issues: Vec<Finding>,
}

impl From<StoredReport> for Report {
    fn from(stored: StoredReport) -> Self {
        Report::assemble_at(stored.playbook_path, stored.issues, stored.report_timestamp)
    }
}

fn serialize_timestamp<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(chrono::SecondsFormat::Micros, true))
}

impl Report {
    /// Assemble a report stamped with the current UTC time
    pub fn assemble(playbook_path: impl Into<String>, issues: Vec<Finding>) -> Self {
        Self::assemble_at(playbook_path, issues, Utc::now())
    }

    /// Assemble a report with an explicit timestamp
    pub fn assemble_at(
        playbook_path: impl Into<String>,
        issues: Vec<Finding>,
        report_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            report_timestamp,
            playbook_path: playbook_path.into(),
            status: ReportStatus::for_issues(&issues),
            issues,
        }
    }

    /// The playbook the report is about
    pub fn playbook_path(&self) -> &str {
        &self.playbook_path
    }

    /// PASS when there are no issues, FAIL otherwise
    pub fn status(&self) -> ReportStatus {
        self.status
    }

    /// Issues, linter findings first
    pub fn issues(&self) -> &[Finding] {
        &self.issues
    }

    /// Render as 4-space indented JSON
    pub fn to_json(&self) -> Result<String, ReportError> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        buffer.push(b'\n');

        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Write `report` to `output_path`, creating the parent directory if needed
/// and replacing any existing file.
pub fn write(report: &Report, output_path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReportError::CreateDir {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let rendered = report.to_json()?;

    fs::write(output_path, rendered).map_err(|e| ReportError::Write {
        path: output_path.display().to_string(),
        source: e,
    })?;

    info!(
        path = %output_path.display(),
        status = %report.status(),
        issues = report.issues().len(),
        "QA report written"
    );
    Ok(())
}

/// Read a report previously produced by [`write`]
pub fn read(path: &Path) -> Result<Report, ReportError> {
    let content = fs::read_to_string(path).map_err(|e| ReportError::Read {
        path: path.display().to_string(),
        source: e,
    })?;

    let report = serde_json::from_str(&content)?;
    debug!(path = %path.display(), "Report loaded");
    Ok(report)
}
