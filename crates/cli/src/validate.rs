//! `validate`: human-readable PASS/FAIL report for a rule document.

use std::fmt::Write as _;
use std::path::Path;

use tracing::warn;

use aml_core::{Result, ScreeningConfig};
use aml_rules::{validate_rules_file, LabelVocabulary, ValidationResult};

use crate::cli::ValidateArgs;

/// Validate the rule document and print the report. `Ok(false)` means the
/// document was read but rejected.
pub fn validate(args: &ValidateArgs, config: &ScreeningConfig) -> Result<bool> {
    let rules_path = args.rules.clone().unwrap_or_else(|| config.rules_path.clone());
    let labels = load_labels(args.labels.as_deref().or(config.labels_path.as_deref()));

    let result = validate_rules_file(&rules_path, labels.as_ref())?;
    print!("{}", render_report(&rules_path, &result, labels.as_ref()));
    Ok(result.valid)
}

/// A missing or unreadable vocabulary only disables the tag-value check.
fn load_labels(path: Option<&Path>) -> Option<LabelVocabulary> {
    let path = path?;
    match LabelVocabulary::load(path) {
        Ok(vocab) if !vocab.is_empty() => Some(vocab),
        Ok(_) => {
            warn!(path = %path.display(), "label table has no rows; skipping tag value checks");
            None
        }
        Err(e) => {
            warn!(error = %e, "skipping tag value checks");
            None
        }
    }
}

pub fn render_report(path: &Path, result: &ValidationResult, labels: Option<&LabelVocabulary>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Validating: {}", path.display());
    let _ = writeln!(out, "{}", "-".repeat(50));

    if !result.valid {
        let _ = writeln!(out, "FAIL: {} error(s) found:", result.errors.len());
        for err in &result.errors {
            let location = if err.path.is_empty() {
                String::new()
            } else {
                format!("{}: ", err.path)
            };
            match &err.suggestion {
                Some(hint) => {
                    let _ = writeln!(out, "  - {location}{} ({hint})", err.message);
                }
                None => {
                    let _ = writeln!(out, "  - {location}{}", err.message);
                }
            }
        }
    } else {
        let _ = writeln!(out, "PASS: {} rule(s) validated successfully.", result.rule_count);
        let _ = writeln!(out, "  - Schema structure: OK");
        let _ = writeln!(out, "  - Rule ID uniqueness: OK");
        if let Some(vocab) = labels {
            let _ = writeln!(
                out,
                "  - Tag values ({} primary, {} secondary labels): OK",
                vocab.primary_len(),
                vocab.secondary_len()
            );
        }
    }

    if !result.warnings.is_empty() {
        let _ = writeln!(out, "{} warning(s):", result.warnings.len());
        for w in &result.warnings {
            let _ = writeln!(out, "  - {}: {}", w.path, w.message);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aml_rules::validate_rules_str;

    const GOOD: &str = r#"[{
        "rule_id": "R1", "category": "Deposit", "risk_level": "High", "action": "Review",
        "conditions": [{ "parameter": "path.node.tags.risk_level", "operator": "==", "value": "high" }]
    }]"#;

    #[test]
    fn pass_report_lists_checks() {
        let result = validate_rules_str(GOOD, None);
        let report = render_report(Path::new("rules.json"), &result, None);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "Validating: rules.json");
        assert_eq!(lines[1].len(), 50);
        assert_eq!(lines[2], "PASS: 1 rule(s) validated successfully.");
        assert!(!report.contains("Tag values"));
    }

    #[test]
    fn fail_report_counts_errors() {
        let result = validate_rules_str("[{\"rule_id\": \"\"}]", None);
        let report = render_report(Path::new("rules.json"), &result, None);
        assert!(report.contains(&format!("FAIL: {} error(s) found:", result.errors.len())));
        assert!(report.lines().filter(|l| l.starts_with("  - [0]")).count() >= 1);
    }

    #[test]
    fn invalid_json_has_no_location_prefix() {
        let result = validate_rules_str("{not json", None);
        let report = render_report(Path::new("r.json"), &result, None);
        assert!(report.contains("  - Invalid JSON: "));
    }

    #[test]
    fn labels_line_shows_vocabulary_size() {
        let table = "| Primary | Desc | Secondary | Desc | Risk | Note |\n|---|---|---|---|---|---|\n| Illicit | x | Gambling | y | high | z |\n";
        let vocab = LabelVocabulary::parse(table);
        let result = validate_rules_str(GOOD, Some(&vocab));
        let report = render_report(Path::new("rules.json"), &result, Some(&vocab));
        assert!(report.contains("  - Tag values (1 primary, 1 secondary labels): OK"));
    }
}
