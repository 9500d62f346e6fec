//! Tests for the rule loader module.

use std::fs;

use tempfile::TempDir;

use aml_core::{InputKind, Scenario, ScreeningError, Severity};

use super::*;

const RULES_JSON: &str = r#"[
  {
    "rule_id": "DEP-001",
    "category": "Deposit",
    "risk_level": "Severe",
    "action": "Freeze",
    "direction": "inflow",
    "conditions": [
      { "parameter": "path.node.tags.primary_category", "operator": "IN", "value": ["Sanctions"] }
    ]
  },
  {
    "rule_id": "WDR-001",
    "category": "Withdrawal",
    "risk_level": "High",
    "action": "Review",
    "conditions": [
      { "parameter": "path.node.tags.risk_level", "operator": "==", "value": "high" }
    ]
  },
  {
    "rule_id": "MON-001",
    "category": "Ongoing Monitoring",
    "risk_level": "Medium",
    "action": "Alert",
    "conditions": []
  }
]"#;

fn write_rules(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("rules.json");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn load_rules_from_file() {
    let (_dir, path) = write_rules(RULES_JSON);
    let set = RuleSet::load(&path).unwrap();

    assert_eq!(set.len(), 3);
    assert_eq!(set.rules()[0].rule_id, "DEP-001");
    assert_eq!(set.get("WDR-001").map(|r| r.action.as_str()), Some("Review"));
    assert_eq!(set.get("DEP-001").map(|r| r.severity()), Some(Severity::Severe));
    assert!(set.get("missing").is_none());
}

#[test]
fn scenario_scopes_by_category() {
    let (_dir, path) = write_rules(RULES_JSON);
    let set = RuleSet::load(&path).unwrap();

    let ids = |sc: Scenario| -> Vec<String> {
        set.for_scenario(sc).iter().map(|r| r.rule_id.clone()).collect()
    };

    assert_eq!(ids(Scenario::All), vec!["DEP-001", "WDR-001", "MON-001"]);
    assert_eq!(ids(Scenario::Deposit), vec!["DEP-001"]);
    assert_eq!(ids(Scenario::Onboarding), vec!["DEP-001"]);
    assert_eq!(ids(Scenario::Withdrawal), vec!["WDR-001"]);
    assert_eq!(ids(Scenario::Monitoring), vec!["MON-001"]);
    assert!(ids(Scenario::Cdd).is_empty());
}

#[test]
fn missing_file_is_input_not_found() {
    let dir = TempDir::new().unwrap();
    let err = RuleSet::load(&dir.path().join("rules.json")).unwrap_err();
    assert!(matches!(
        err,
        ScreeningError::InputNotFound { kind: InputKind::Rules, .. }
    ));
}

#[test]
fn invalid_json_is_malformed_input() {
    let (_dir, path) = write_rules(r#"{"rule_id": "not-an-array"}"#);
    let err = RuleSet::load(&path).unwrap_err();
    assert!(matches!(
        err,
        ScreeningError::MalformedInput { kind: InputKind::Rules, .. }
    ));
}

#[test]
fn duplicate_ids_resolve_to_last_declaration() {
    let (_dir, path) = write_rules(
        r#"[
          { "rule_id": "R1", "risk_level": "Low" },
          { "rule_id": "R1", "risk_level": "High" }
        ]"#,
    );
    let set = RuleSet::load(&path).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.get("R1").map(|r| r.severity()), Some(Severity::High));
    assert_eq!(set.get("R1").map(|r| r.risk_level.as_str()), Some("High"));
}
