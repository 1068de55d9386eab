//! JSON Schema for the QA report

use serde_json::Value;

use super::Report;
use crate::error::ReportError;

/// JSON Schema (draft 2020-12) describing the written report
pub const REPORT_SCHEMA: &str = r#"{
    "$schema": "https://json-schema.org/draft/2020-12/schema",
    "$id": "https://playbook-qa.dev/schemas/report.json",
    "title": "playbook-qa report",
    "type": "object",
    "required": ["report_timestamp", "playbook_path", "status", "issues"],
    "additionalProperties": false,
    "properties": {
        "report_timestamp": {"type": "string", "format": "date-time"},
        "playbook_path": {"type": "string"},
        "status": {"enum": ["PASS", "FAIL"]},
        "issues": {
            "type": "array",
            "items": {
                "type": "object",
                "required": ["rule_id", "severity", "description", "file", "line"],
                "additionalProperties": false,
                "properties": {
                    "rule_id": {"type": "string", "minLength": 1},
                    "severity": {"type": "string"},
                    "description": {"type": "string"},
                    "file": {"type": "string"},
                    "line": {"type": ["integer", "null"], "minimum": 1},
                    "match": {"type": "string"}
                }
            }
        }
    },
    "if": {"properties": {"issues": {"maxItems": 0}}},
    "then": {"properties": {"status": {"const": "PASS"}}},
    "else": {"properties": {"status": {"const": "FAIL"}}}
}"#;

/// Validate `report` against [`REPORT_SCHEMA`]
pub fn validate(report: &Report) -> Result<(), ReportError> {
    let instance = serde_json::to_value(report)?;
    validate_value(&instance)
}

/// Validate an arbitrary JSON document against [`REPORT_SCHEMA`]
pub fn validate_value(instance: &Value) -> Result<(), ReportError> {
    let schema: Value = serde_json::from_str(REPORT_SCHEMA)?;
    let validator = jsonschema::validator_for(&schema).map_err(|e| ReportError::Validation {
        errors: vec![format!("invalid schema: {}", e)],
    })?;

    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| format!("{} at '{}'", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ReportError::Validation { errors })
    }
}
