//! Rule document validation with structured errors and suggestions.
//!
//! Checks a raw rule document against the authoring schema (required fields,
//! enumerations, condition shape), rule-id uniqueness, and optionally the
//! controlled tag-label vocabulary. Returns a [`ValidationResult`] with errors
//! (document rejected) and warnings (advisory).
//!
//! Validation works on raw JSON rather than [`aml_core::Rule`] because the
//! screening engine parses rules leniently and would hide missing fields.

mod fuzzy;
mod labels;
mod schema_checks;

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use aml_core::Result;

pub use labels::LabelVocabulary;

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// Number of rules in the document (0 when the root is not an array).
    pub rule_count: usize,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON-path-like location, e.g. `"[2].conditions[0].operator"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            rule_count: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: Option<&str>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: suggestion.map(|s| format!("Did you mean '{s}'?")),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate an already-parsed rule document.
pub fn validate_rules(document: &Value, labels: Option<&LabelVocabulary>) -> ValidationResult {
    let mut result = ValidationResult::new();

    let Some(rules) = document.as_array() else {
        result.error("", "Root element must be a JSON array");
        return result;
    };
    result.rule_count = rules.len();

    for (i, rule) in rules.iter().enumerate() {
        schema_checks::validate_rule(i, rule, &mut result);
        if let Some(vocab) = labels {
            vocab.check_rule(i, rule, &mut result);
        }
    }
    schema_checks::validate_rule_id_uniqueness(rules, &mut result);

    result
}

/// Parse raw JSON and validate. Parse errors are reported as a single error.
pub fn validate_rules_str(json: &str, labels: Option<&LabelVocabulary>) -> ValidationResult {
    match serde_json::from_str::<Value>(json) {
        Ok(doc) => validate_rules(&doc, labels),
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("", format!("Invalid JSON: {e}"));
            result
        }
    }
}

/// Read and validate a rule file. Only a missing or unreadable file is an `Err`.
pub fn validate_rules_file(path: &Path, labels: Option<&LabelVocabulary>) -> Result<ValidationResult> {
    if !path.is_file() {
        return Err(aml_core::ScreeningError::InputNotFound {
            kind: aml_core::InputKind::Rules,
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(validate_rules_str(&contents, labels))
}

// ── Tests ───────────────────────────────────────────────────────────
