//! Rule condition evaluator over tag tiers.
//!
//! A rule's conditions address one of three tiers (see [`Tier`]):
//! - **Node**: tags of a counterparty met along a path (`path.node.tags.*`)
//! - **Target**: the investigated address's own tags (`target.tags.*`)
//! - **Narrative**: everything else, left to the downstream report writer
//!
//! The node and target tiers share one evaluator; the tier only decides which
//! parameters are readable. Conditions of other tiers come back as
//! [`ConditionOutcome::NotApplicable`] and are skipped.

mod applicability;

use tracing::trace;

use aml_core::{Condition, FlowDirection, Operator, Rule, Tag, TagDimension, Tier};

pub use applicability::rule_applies;

// ── Condition outcome ───────────────────────────────────────────────

/// Result of evaluating one condition against one tag.
///
/// `NoMatch` means the tag was checked and failed (including a tag that has no
/// value for the dimension). `NotApplicable` means the condition belongs to a
/// different tier and was not checked at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOutcome {
    Match,
    NoMatch,
    NotApplicable,
}

impl From<bool> for ConditionOutcome {
    fn from(matched: bool) -> Self {
        if matched {
            ConditionOutcome::Match
        } else {
            ConditionOutcome::NoMatch
        }
    }
}

/// Operators the engine can decide for a tag dimension.
///
/// Risk levels are an ordered scale rather than a label set, so exclusion
/// (`NOT_IN`) is not offered for them.
pub fn supports_operator(dimension: TagDimension, operator: &Operator) -> bool {
    match operator {
        Operator::Eq | Operator::Ne | Operator::In => true,
        Operator::NotIn => dimension != TagDimension::RiskLevel,
        Operator::Unsupported(_) => false,
    }
}

/// Evaluate a single condition against a tag at the given tier.
pub fn evaluate_condition(condition: &Condition, tier: Tier, tag: &Tag) -> ConditionOutcome {
    let Some(dimension) = condition.parameter.dimension_for(tier) else {
        return ConditionOutcome::NotApplicable;
    };
    let Some(actual) = tag.dimension(dimension) else {
        return ConditionOutcome::NoMatch;
    };
    if !supports_operator(dimension, &condition.operator) {
        return ConditionOutcome::NoMatch;
    }

    let value = &condition.value;
    let matched = match condition.operator {
        Operator::Eq => value.equals(actual),
        Operator::Ne => !value.equals(actual),
        Operator::In => value.contains(actual).unwrap_or(false),
        Operator::NotIn => value.contains(actual).is_some_and(|found| !found),
        Operator::Unsupported(_) => false,
    };
    ConditionOutcome::from(matched)
}

// ── Rule evaluator ──────────────────────────────────────────────────

/// Decides whether whole rules match a tag.
pub struct RuleEvaluator;

impl RuleEvaluator {
    /// AND across every condition evaluable at `tier`.
    ///
    /// A rule with no condition at this tier cannot be decided here and does
    /// not match.
    pub fn matches(rule: &Rule, tier: Tier, tag: &Tag) -> bool {
        let mut evaluated = 0usize;
        for condition in &rule.conditions {
            match evaluate_condition(condition, tier, tag) {
                ConditionOutcome::NotApplicable => continue,
                ConditionOutcome::NoMatch => {
                    trace!(rule_id = %rule.rule_id, parameter = %condition.parameter, "condition failed");
                    return false;
                }
                ConditionOutcome::Match => evaluated += 1,
            }
        }
        evaluated > 0
    }

    /// Node tier: the rule must be applicable at this direction and hop
    /// distance, then match the node's winning tag.
    pub fn node_matches(rule: &Rule, direction: FlowDirection, hops: usize, tag: &Tag) -> bool {
        rule_applies(rule, direction, hops) && Self::matches(rule, Tier::Node, tag)
    }

    /// Target tier: direction and hop constraints do not apply to the target itself.
    pub fn target_matches(rule: &Rule, tag: &Tag) -> bool {
        Self::matches(rule, Tier::Target, tag)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
