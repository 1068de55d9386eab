//! Pattern scanner
//!
//! Applies custom rules to playbook text line by line. Patterns are compiled
//! once, case-insensitively; a rule whose pattern does not compile is skipped
//! for the whole scan and reported as a [`PatternError`].
//!
//! Findings are ordered by line number, then by rule declaration order. A
//! rule contributes at most one finding per line.

use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::{debug, warn};

use super::results::Finding;
use super::store::Rule;

/// A rule whose pattern could not be compiled
#[derive(Error, Debug, Clone)]
#[error("Invalid regex pattern for rule {rule_id}: {pattern} - {source}")]
pub struct PatternError {
    /// Id of the skipped rule
    pub rule_id: String,
    /// The offending pattern
    pub pattern: String,
    /// Compilation error reported by the regex engine
    pub source: regex::Error,
}

struct CompiledRule<'a> {
    rule: &'a Rule,
    regex: Regex,
}

/// Rules compiled for repeated scanning
pub struct PatternScanner<'a> {
    compiled: Vec<CompiledRule<'a>>,
    rejected: Vec<PatternError>,
}

impl<'a> PatternScanner<'a> {
    /// Compile `rules`, keeping their declaration order
    pub fn new(rules: &'a [Rule]) -> Self {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut rejected = Vec::new();

        for rule in rules {
            match RegexBuilder::new(&rule.pattern)
                .case_insensitive(true)
                .build()
            {
                Ok(regex) => compiled.push(CompiledRule { rule, regex }),
                Err(e) => {
                    let error = PatternError {
                        rule_id: rule.id.clone(),
                        pattern: rule.pattern.clone(),
                        source: e,
                    };
                    warn!(rule_id = %rule.id, error = %error, "Skipping rule with invalid pattern");
                    rejected.push(error);
                }
            }
        }

        Self { compiled, rejected }
    }

    /// Rules skipped because their pattern did not compile
    pub fn rejected(&self) -> &[PatternError] {
        &self.rejected
    }

    /// Scan `content`, attributing findings to `playbook_path`
    pub fn scan(&self, content: &str, playbook_path: &str) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (index, line) in split_lines(content).enumerate() {
            let line_num = index + 1;

            for compiled in &self.compiled {
                if compiled.regex.is_match(line) {
                    debug!(rule_id = %compiled.rule.id, line = line_num, "Match found");
                    findings.push(
                        Finding::new(
                            compiled.rule.id.as_str(),
                            compiled.rule.severity.as_str(),
                            compiled.rule.description.as_str(),
                            playbook_path,
                        )
                        .with_line(line_num)
                        .with_match(line.trim()),
                    );
                }
            }
        }

        debug!(
            rules = self.compiled.len(),
            findings = findings.len(),
            "Custom rule scan finished"
        );
        findings
    }
}

/// Scan `content` against `rules` in one go.
///
/// Invalid patterns are logged and skipped; use [`PatternScanner`] directly
/// to inspect them.
pub fn scan(content: &str, rules: &[Rule], playbook_path: &str) -> Vec<Finding> {
    PatternScanner::new(rules).scan(content, playbook_path)
}

/// Characters that end a line. `\r\n` counts as a single break.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split `content` into lines on any line break character (see
/// [`is_line_break`]). A trailing line break does not produce an extra
/// empty line.
pub fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = content;

    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }

        match rest.char_indices().find(|(_, c)| is_line_break(*c)) {
            Some((pos, c)) => {
                let line = &rest[..pos];
                let skip = if rest[pos..].starts_with("\r\n") { 2 } else { c.len_utf8() };
                rest = &rest[pos + skip..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn become_rule() -> Rule {
        Rule::new(
            "R1",
            r"become:\s*true",
            "Avoid unconditional become",
            "HIGH",
        )
    }

    #[test]
    fn test_become_scenario() {
        let content = "---\n- hosts: all\n  tasks:\n    - name: x\n  become: true\n";

        let findings = scan(content, &[become_rule()], "site.yml");

        assert_eq!(
            findings,
            vec![Finding::new("R1", "HIGH", "Avoid unconditional become", "site.yml")
                .with_line(5)
                .with_match("become: true")]
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let findings = scan("  BECOME: True", &[become_rule()], "site.yml");

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].matched.as_deref(), Some("BECOME: True"));
    }

    #[test]
    fn test_one_finding_per_rule_per_line() {
        let rule = Rule::new("R1", "x", "d", "LOW");

        let findings = scan("x x x\nx", &[rule], "p");

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].line, Some(1));
        assert_eq!(findings[1].line, Some(2));
    }

    #[test]
    fn test_order_is_line_then_declaration() {
        let rules = vec![
            Rule::new("B", "beta", "d", "LOW"),
            Rule::new("A", "alpha", "d", "LOW"),
        ];

        let findings = scan("alpha beta\nbeta\nalpha", &rules, "p");

        let order: Vec<_> = findings
            .iter()
            .map(|f| (f.line.unwrap(), f.rule_id.as_str()))
            .collect();
        assert_eq!(order, vec![(1, "B"), (1, "A"), (2, "B"), (3, "A")]);
    }

    #[test]
    fn test_invalid_pattern_is_skipped_and_others_still_run() {
        let rules = vec![
            Rule::new("BAD", "[unclosed", "d", "LOW"),
            Rule::new("GOOD", "todo", "d", "LOW"),
        ];

        let scanner = PatternScanner::new(&rules);
        let findings = scanner.scan("TODO one\nfine\ntodo two", "p");

        assert_eq!(scanner.rejected().len(), 1);
        assert_eq!(scanner.rejected()[0].rule_id, "BAD");
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.rule_id == "GOOD"));
    }

    #[test]
    fn test_findings_never_exceed_lines_times_rules() {
        let rules = vec![
            Rule::new("A", ".", "d", "LOW"),
            Rule::new("B", ".*", "d", "LOW"),
            Rule::new("C", "a", "d", "LOW"),
        ];
        let content = "a\naa\n\na a a\n";

        let findings = scan(content, &rules, "p");

        let lines = split_lines(content).count();
        assert!(findings.len() <= lines * rules.len());
        assert_eq!(lines, 4);
    }

    #[test]
    fn test_empty_content_and_empty_rules() {
        assert!(scan("", &[become_rule()], "p").is_empty());
        assert!(scan("become: true", &[], "p").is_empty());
    }

    #[test]
    fn test_split_lines_handles_all_line_breaks() {
        let lines: Vec<_> = split_lines("a\r\nb\rc\nd").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_split_lines_no_trailing_empty_line() {
        assert_eq!(split_lines("a\n").count(), 1);
        assert_eq!(split_lines("a\r\n").count(), 1);
        assert_eq!(split_lines("a\n\n").count(), 2);
        assert_eq!(split_lines("").count(), 0);
    }

    #[test]
    fn test_crlf_line_numbers() {
        let rules = vec![Rule::new("R", "become", "d", "LOW")];

        let findings = scan("one\r\ntwo\r\nbecome: yes", &rules, "p");

        assert_eq!(findings[0].line, Some(3));
        assert_eq!(findings[0].matched.as_deref(), Some("become: yes"));
    }

    #[test]
    fn test_split_lines_unicode_and_control_breaks() {
        let content = "a\u{0b}b\u{0c}c\u{1c}d\u{1d}e\u{1e}f\u{85}g\u{2028}h\u{2029}i";

        let lines: Vec<_> = split_lines(content).collect();

        assert_eq!(lines, vec!["a", "b", "c", "d", "e", "f", "g", "h", "i"]);
    }

    #[test]
    fn test_form_feed_and_line_separator_start_new_lines() {
        for content in [
            "- hosts: all\u{0c}  become: true\n",
            "- hosts: all\u{2028}  become: true\n",
            "- hosts: all\u{0b}  become: true\n",
            "- hosts: all\u{85}  become: true\n",
        ] {
            let findings = scan(content, &[become_rule()], "site.yml");

            assert_eq!(findings.len(), 1, "content: {:?}", content);
            assert_eq!(findings[0].line, Some(2));
            assert_eq!(findings[0].matched.as_deref(), Some("become: true"));
        }
    }
}
