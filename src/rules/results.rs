//! # Finding Structures
//!
//! This module defines [`Finding`], the single normalized issue record that
//! both the external linter and the custom pattern rules produce.
//!
//! ## Examples
//!
//! ```rust
//! use playbook_qa::rules::Finding;
//!
//! let finding = Finding::new("R1", "HIGH", "Avoid unconditional become", "site.yml")
//!     .with_line(5)
//!     .with_match("become: true");
//!
//! assert_eq!(finding.line, Some(5));
//! ```

use serde::{Deserialize, Serialize};

/// A single normalized issue, regardless of which source reported it.
///
/// Pattern-rule findings always carry `line` and `matched`. Linter findings
/// never carry `matched`, and carry `line` only when the linter reported a
/// position. The JSON form uses the key `match` and omits it when absent;
/// `line` is written as `null` when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Rule identifier. Linter rules are namespaced (`ansible-lint:<id>`).
    pub rule_id: String,

    /// Severity as reported by the source.
    pub severity: String,

    /// Human-readable description of the problem.
    pub description: String,

    /// Path of the file the issue belongs to.
    pub file: String,

    /// 1-based line number, when known.
    #[serde(default)]
    pub line: Option<usize>,

    /// Trimmed text of the matching line (pattern rules only).
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
}

impl Finding {
    /// Create a new finding without position information
    pub fn new(
        rule_id: impl Into<String>,
        severity: impl Into<String>,
        description: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity: severity.into(),
            description: description.into(),
            file: file.into(),
            line: None,
            matched: None,
        }
    }

    /// Set the line number
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Set the matched text
    pub fn with_match(mut self, matched: impl Into<String>) -> Self {
        self.matched = Some(matched.into());
        self
    }
}
