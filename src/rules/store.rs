//! Custom rule store
//!
//! Loads user-defined pattern rules from a JSON file. The file must contain a
//! top-level list of objects, each with the string fields `id`, `pattern`,
//! `description` and `severity`:
//!
//! ```json
//! [
//!   {
//!     "id": "R1",
//!     "pattern": "become:\\s*true",
//!     "description": "Avoid unconditional become",
//!     "severity": "HIGH"
//!   }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::utils::json;

/// Fields every rule must declare, in the order they are checked
const REQUIRED_FIELDS: [&str; 4] = ["id", "pattern", "description", "severity"];

/// A user-authored pattern check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule identifier. Uniqueness is recommended, not enforced.
    pub id: String,
    /// Regular expression, matched case-insensitively against each line
    pub pattern: String,
    /// Human-readable description copied into findings
    pub description: String,
    /// Free-form severity copied into findings as authored
    pub severity: String,
}

impl Rule {
    /// Create a new rule
    pub fn new(
        id: impl Into<String>,
        pattern: impl Into<String>,
        description: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            pattern: pattern.into(),
            description: description.into(),
            severity: severity.into(),
        }
    }
}

/// Load and validate the rule set stored at `path`.
///
/// Rules are returned in declaration order. Duplicate ids are accepted and
/// only reported through a warning.
pub fn load(path: &Path) -> Result<Vec<Rule>, ConfigError> {
    let shown = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::RulesNotFound {
            path: shown.clone(),
        },
        _ => ConfigError::RulesRead {
            path: shown.clone(),
            source: e,
        },
    })?;

    let rules = parse(&content, &shown)?;

    info!(path = %shown, count = rules.len(), "Loaded custom rules");
    Ok(rules)
}

/// Parse a rule set from JSON text. `origin` is only used in error messages.
pub fn parse(content: &str, origin: &str) -> Result<Vec<Rule>, ConfigError> {
    let value: Value = serde_json::from_str(content).map_err(|e| ConfigError::RulesParse {
        path: origin.to_string(),
        source: e,
    })?;

    let entries = match value {
        Value::Array(entries) => entries,
        other => {
            return Err(ConfigError::RulesNotList {
                path: origin.to_string(),
                found: json::kind(&other),
            })
        }
    };

    let rules = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| rule_from_value(entry, index, origin))
        .collect::<Result<Vec<_>, _>>()?;

    warn_duplicate_ids(&rules, origin);

    Ok(rules)
}

fn rule_from_value(entry: &Value, index: usize, origin: &str) -> Result<Rule, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidRule {
        path: origin.to_string(),
        index,
        reason,
    };

    let object = entry
        .as_object()
        .ok_or_else(|| invalid(format!("expected an object, found {}", json::kind(entry))))?;

    for field in REQUIRED_FIELDS {
        match object.get(field) {
            None => return Err(invalid(format!("missing field '{}'", field))),
            Some(Value::String(_)) => {}
            Some(other) => {
                return Err(invalid(format!(
                    "field '{}' must be a string, found {}",
                    field,
                    json::kind(other)
                )))
            }
        }
    }

    Ok(Rule::new(
        string_field(object, "id"),
        string_field(object, "pattern"),
        string_field(object, "description"),
        string_field(object, "severity"),
    ))
}

fn string_field(object: &Map<String, Value>, field: &str) -> String {
    object
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn warn_duplicate_ids(rules: &[Rule], origin: &str) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    for rule in rules {
        if !seen.insert(rule.id.as_str()) && reported.insert(rule.id.as_str()) {
            warn!(rule_id = %rule.id, path = %origin, "Duplicate custom rule id");
        }
    }
}
