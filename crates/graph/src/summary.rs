//! Finding order and the screening summary.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use aml_core::{Rule, Scenario, Severity};

use crate::walker::Finding;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub scenario: Scenario,
    pub categories_applied: Vec<String>,
    pub total_paths_analyzed: usize,
    pub paths_direction_filtered: usize,
    pub unique_risk_entities: usize,
    pub rules_loaded: usize,
    pub rules_total_available: usize,
    pub rules_triggered: BTreeSet<String>,
    pub highest_severity: Severity,
}

/// Most severe first, then nearest first. Stable, so equal keys keep first-seen order.
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by_key(|f| (Severity::rank_of(&f.tag.risk_level), f.min_deep));
}

/// Overall severity of a screening.
///
/// Starts at `Low`. Finding tags can only raise it to `High` or `Severe`;
/// the declared level of every triggered rule can raise it to anything.
///
/// `rules` must be the scenario-scoped list, so a rule id reused in an
/// out-of-scope category never contributes its level. Among in-scope rules
/// sharing an id, the last declaration wins.
pub fn highest_severity<'a>(
    findings: &[Finding],
    triggered: impl IntoIterator<Item = &'a String>,
    rules: &[&Rule],
) -> Severity {
    let declared: HashMap<&str, Severity> = rules
        .iter()
        .map(|r| (r.rule_id.as_str(), r.severity()))
        .collect();

    let from_tags = findings
        .iter()
        .filter_map(|f| Severity::parse_lenient(&f.tag.risk_level))
        .filter(|s| matches!(s, Severity::Severe | Severity::High));
    let from_rules = triggered
        .into_iter()
        .map(|id| declared.get(id.as_str()).copied().unwrap_or(Severity::Low));

    from_tags
        .chain(from_rules)
        .fold(Severity::Low, |acc, s| if s.is_more_severe_than(acc) { s } else { acc })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aml_core::TagSnapshot;
    use serde_json::json;

    fn finding(address: &str, risk: &str, deep: usize) -> Finding {
        Finding {
            address: address.into(),
            min_deep: deep,
            tag: TagSnapshot {
                risk_level: risk.into(),
                ..TagSnapshot::default()
            },
            matched_rules: BTreeSet::new(),
            evidence_paths: Vec::new(),
            occurrences: 1,
        }
    }

    fn rules(levels: &[(&str, &str)]) -> Vec<Rule> {
        levels
            .iter()
            .map(|(id, level)| serde_json::from_value(json!({ "rule_id": id, "risk_level": level })).unwrap())
            .collect()
    }

    #[test]
    fn sorts_by_severity_then_depth_stably() {
        let mut f = vec![
            finding("m", "medium", 1),
            finding("h2", "high", 2),
            finding("u", "unknown", 1),
            finding("s", "Severe", 4),
            finding("h1a", "high", 1),
            finding("h1b", "HIGH", 1),
        ];
        sort_findings(&mut f);
        let order: Vec<&str> = f.iter().map(|f| f.address.as_str()).collect();
        assert_eq!(order, vec!["s", "h1a", "h1b", "h2", "m", "u"]);
    }

    #[test]
    fn medium_tags_do_not_raise_severity() {
        let rules: Vec<&Rule> = Vec::new();
        let none: Vec<String> = Vec::new();
        assert_eq!(highest_severity(&[finding("a", "medium", 1)], &none, &rules), Severity::Low);
        assert_eq!(highest_severity(&[finding("a", "high", 1)], &none, &rules), Severity::High);
    }

    #[test]
    fn triggered_rule_levels_raise_severity() {
        let owned = rules(&[("R-M", "Medium"), ("R-S", "severe")]);
        let rules: Vec<&Rule> = owned.iter().collect();
        let medium = vec!["R-M".to_string()];
        assert_eq!(highest_severity(&[], &medium, &rules), Severity::Medium);

        let both = vec!["R-M".to_string(), "R-S".to_string()];
        assert_eq!(highest_severity(&[finding("a", "high", 1)], &both, &rules), Severity::Severe);

        let unknown = vec!["nope".to_string()];
        assert_eq!(highest_severity(&[], &unknown, &rules), Severity::Low);
    }

    #[test]
    fn duplicate_ids_use_the_last_in_scope_level() {
        let owned = rules(&[("R1", "Low"), ("R1", "High")]);
        let triggered = vec!["R1".to_string()];

        let both: Vec<&Rule> = owned.iter().collect();
        assert_eq!(highest_severity(&[], &triggered, &both), Severity::High);

        let first_only: Vec<&Rule> = owned.iter().take(1).collect();
        assert_eq!(highest_severity(&[], &triggered, &first_only), Severity::Low);
    }
}
