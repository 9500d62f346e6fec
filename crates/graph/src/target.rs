//! Screening of the target address's own tags.

use serde::Serialize;
use tracing::debug;

use aml_core::{Rule, Tag, TagSnapshot, Tier};
use aml_rules::RuleEvaluator;

/// A target tag that matched at least one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetFinding {
    pub tag: TagSnapshot,
    /// Sorted and deduplicated.
    pub matched_rules: Vec<String>,
}

/// Evaluate every target tag against the rules that carry target-tier conditions.
///
/// Direction and hop constraints do not apply here. Tags that match nothing
/// are omitted.
pub fn evaluate_target(rules: &[&Rule], tags: &[Tag]) -> Vec<TargetFinding> {
    let target_rules: Vec<&Rule> = rules
        .iter()
        .copied()
        .filter(|r| r.has_conditions_for(Tier::Target))
        .collect();
    if target_rules.is_empty() || tags.is_empty() {
        return Vec::new();
    }

    let findings: Vec<TargetFinding> = tags
        .iter()
        .filter_map(|tag| {
            let mut matched: Vec<String> = target_rules
                .iter()
                .filter(|rule| RuleEvaluator::target_matches(rule, tag))
                .map(|rule| rule.rule_id.clone())
                .collect();
            if matched.is_empty() {
                return None;
            }
            matched.sort();
            matched.dedup();
            Some(TargetFinding {
                tag: TagSnapshot::from(tag),
                matched_rules: matched,
            })
        })
        .collect();

    debug!(
        target_rules = target_rules.len(),
        tags = tags.len(),
        hits = findings.len(),
        "target self-screening complete"
    );
    findings
}
