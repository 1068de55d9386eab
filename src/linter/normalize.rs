//! Linter output normalization
//!
//! The linter's JSON output is not contractually stable. Two top-level
//! shapes are recognised ([`OutputShape`]) and, inside them, two record
//! layouts ([`RecordLayout`]):
//!
//! - legacy records: `{"rule": {"id", "severity"}, "message", "filename", "linenumber"}`
//! - CodeClimate records: `{"check_name", "severity", "description", "location": {"path", "lines": {"begin"}}}`
//!
//! Anything else degrades to an empty finding list plus a [`ParseAnomaly`].

use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, info, warn};

use crate::rules::Finding;
use crate::utils::json;

/// Prefix added to linter rule ids to keep them apart from custom rule ids
pub const RULE_ID_PREFIX: &str = "ansible-lint:";
/// Rule id used when a record does not carry one
pub const UNKNOWN_RULE_ID: &str = "UnknownRuleID";
/// Severity used when a record does not carry one
pub const DEFAULT_SEVERITY: &str = "MEDIUM";
/// Description used when a record does not carry one
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";
/// Keys under which an object-shaped output may nest its issue list
pub const NESTED_KEYS: [&str; 4] = ["issues", "results", "matches", "violations"];

const SNIPPET_LEN: usize = 200;

/// Linter output that was present but unusable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAnomaly {
    /// Output is not JSON, e.g. the human-readable format
    NotJson {
        /// Start of the offending output
        snippet: String,
    },
    /// Output is JSON but neither a list nor an object with a known list key
    UnexpectedShape {
        /// Kind of JSON value found
        found: &'static str,
    },
}

impl fmt::Display for ParseAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotJson { snippet } => write!(f, "output is not JSON: {}", snippet),
            Self::UnexpectedShape { found } => {
                write!(f, "unexpected JSON structure ({})", found)
            }
        }
    }
}

/// Top-level shape of the linter's JSON output
#[derive(Debug, Clone, PartialEq)]
pub enum OutputShape {
    /// A bare list of issue records
    IssueList(Vec<Value>),
    /// An object holding the issue list under `key`
    Nested {
        /// Key the list was found under
        key: &'static str,
        /// The issue records
        items: Vec<Value>,
    },
}

impl OutputShape {
    /// Recognise the shape of a parsed value
    pub fn detect(value: Value) -> Result<Self, ParseAnomaly> {
        match value {
            Value::Array(items) => Ok(Self::IssueList(items)),
            Value::Object(mut object) => {
                for key in NESTED_KEYS {
                    if matches!(object.get(key), Some(Value::Array(_))) {
                        if let Some(Value::Array(items)) = object.remove(key) {
                            return Ok(Self::Nested { key, items });
                        }
                    }
                }
                Err(ParseAnomaly::UnexpectedShape {
                    found: "an object without an issue list",
                })
            }
            other => Err(ParseAnomaly::UnexpectedShape {
                found: json::kind(&other),
            }),
        }
    }

    /// The issue records, whatever the shape
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::IssueList(items) | Self::Nested { items, .. } => items,
        }
    }
}

/// Layout of a single issue record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    /// `rule` / `message` / `filename` / `linenumber`
    Legacy,
    /// `check_name` / `description` / `location`
    CodeClimate,
}

impl RecordLayout {
    /// Pick the layout of `record`
    pub fn detect(record: &Map<String, Value>) -> Self {
        if record.contains_key("check_name") || record.contains_key("location") {
            Self::CodeClimate
        } else {
            Self::Legacy
        }
    }
}

/// Result of normalizing linter output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    /// Findings in the order the linter reported them
    pub findings: Vec<Finding>,
    /// Set when output was present but unusable
    pub anomaly: Option<ParseAnomaly>,
}

impl Normalized {
    fn degraded(anomaly: ParseAnomaly) -> Self {
        Self {
            findings: Vec::new(),
            anomaly: Some(anomaly),
        }
    }
}

/// Normalize raw linter output into findings.
///
/// Never fails: empty output yields no findings, unusable output yields no
/// findings and an anomaly.
pub fn normalize(raw: Option<&str>, playbook_path: &str) -> Normalized {
    let raw = match raw.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => {
            info!(playbook = %playbook_path, "Empty output from linter, assuming no issues");
            return Normalized::default();
        }
    };

    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            let anomaly = ParseAnomaly::NotJson {
                snippet: json::snippet(raw, SNIPPET_LEN),
            };
            warn!(
                playbook = %playbook_path,
                error = %e,
                %anomaly,
                "Failed to decode linter output"
            );
            return Normalized::degraded(anomaly);
        }
    };

    let shape = match OutputShape::detect(value) {
        Ok(shape) => shape,
        Err(anomaly) => {
            warn!(playbook = %playbook_path, %anomaly, "Unexpected linter output");
            return Normalized::degraded(anomaly);
        }
    };

    if let OutputShape::Nested { key, .. } = &shape {
        debug!(key = *key, "Linter issues nested under key");
    }

    let findings: Vec<Finding> = shape
        .into_items()
        .iter()
        .filter_map(|item| match item.as_object() {
            Some(record) => Some(finding_from_record(record, playbook_path)),
            None => {
                debug!(found = json::kind(item), "Skipping non-object linter record");
                None
            }
        })
        .collect();

    info!(playbook = %playbook_path, count = findings.len(), "Parsed linter issues");
    Normalized {
        findings,
        anomaly: None,
    }
}

fn finding_from_record(record: &Map<String, Value>, playbook_path: &str) -> Finding {
    let fields = match RecordLayout::detect(record) {
        RecordLayout::Legacy => legacy_fields(record),
        RecordLayout::CodeClimate => codeclimate_fields(record),
    };

    let finding = Finding::new(
        format!(
            "{}{}",
            RULE_ID_PREFIX,
            fields.rule_id.unwrap_or(UNKNOWN_RULE_ID)
        ),
        fields
            .severity
            .map(str::to_uppercase)
            .unwrap_or_else(|| DEFAULT_SEVERITY.to_string()),
        fields.description.unwrap_or(DEFAULT_DESCRIPTION),
        fields.file.unwrap_or(playbook_path),
    );

    match fields.line {
        Some(line) => finding.with_line(line),
        None => finding,
    }
}

#[derive(Default)]
struct RecordFields<'a> {
    rule_id: Option<&'a str>,
    severity: Option<&'a str>,
    description: Option<&'a str>,
    file: Option<&'a str>,
    line: Option<usize>,
}

fn legacy_fields(record: &Map<String, Value>) -> RecordFields<'_> {
    let rule = record.get("rule");

    RecordFields {
        rule_id: match rule {
            Some(Value::String(id)) => Some(id.as_str()),
            Some(rule) => str_at(rule, "id"),
            None => None,
        },
        severity: rule
            .and_then(|rule| str_at(rule, "severity"))
            .or_else(|| record.get("severity").and_then(Value::as_str)),
        description: record.get("message").and_then(Value::as_str),
        file: record.get("filename").and_then(Value::as_str),
        line: record
            .get("linenumber")
            .or_else(|| record.get("lineno"))
            .and_then(positive_line),
    }
}

fn codeclimate_fields(record: &Map<String, Value>) -> RecordFields<'_> {
    let location = record.get("location");

    let line = location.and_then(|location| {
        location
            .get("lines")
            .and_then(|lines| lines.get("begin"))
            .and_then(|begin| {
                positive_line(begin).or_else(|| begin.get("line").and_then(positive_line))
            })
            .or_else(|| {
                location
                    .get("positions")
                    .and_then(|positions| positions.get("begin"))
                    .and_then(|begin| begin.get("line"))
                    .and_then(positive_line)
            })
    });

    RecordFields {
        rule_id: record.get("check_name").and_then(Value::as_str),
        severity: record.get("severity").and_then(Value::as_str),
        description: record.get("description").and_then(Value::as_str),
        file: location.and_then(|location| str_at(location, "path")),
        line,
    }
}

fn str_at<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn positive_line(value: &Value) -> Option<usize> {
    value
        .as_u64()
        .filter(|line| *line >= 1)
        .and_then(|line| usize::try_from(line).ok())
}
