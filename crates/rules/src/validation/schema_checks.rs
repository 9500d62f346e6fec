//! Schema validation: required fields, enumerations, hop ranges, conditions, id uniqueness.

use std::collections::HashMap;

use serde_json::{Map, Value};

use aml_core::{FlowDirection, Operator, Parameter, Severity, TagDimension, Tier};

use super::fuzzy::{fuzzy_match, levenshtein};
use super::ValidationResult;
use crate::evaluator::supports_operator;

pub(super) const CATEGORIES: &[&str] = &["Deposit", "Withdrawal", "CDD", "Ongoing Monitoring"];
const REQUIRED_FIELDS: &[&str] = &["rule_id", "category", "risk_level", "action", "conditions"];
const CONDITION_FIELDS: &[&str] = &["parameter", "operator", "value"];
/// Tag operators plus the numeric comparisons used by narrative-tier conditions.
const OPERATORS: &[&str] = &["==", "!=", "IN", "NOT_IN", ">", ">=", "<", "<="];
const TAG_PREFIXES: &[&str] = &["path.node.tags.", "target.tags."];
/// Narrative-tier parameters the downstream reviewer understands. Others are
/// accepted with a warning.
const NARRATIVE_PARAMETERS: &[&str] = &["path.node.amount", "path.hops", "target.balance"];
/// Edit distance at which an unknown narrative parameter counts as a typo.
const NARRATIVE_TYPO_DISTANCE: usize = 2;

// ── Rule-level checks ───────────────────────────────────────────────

pub(super) fn validate_rule(index: usize, rule: &Value, result: &mut ValidationResult) {
    let prefix = format!("[{index}]");
    let Some(obj) = rule.as_object() else {
        result.error(prefix, "rule must be a JSON object");
        return;
    };

    for field in REQUIRED_FIELDS {
        if !obj.contains_key(*field) {
            result.error(format!("{prefix}.{field}"), format!("missing required field '{field}'"));
        }
    }

    if let Some(id) = obj.get("rule_id") {
        if id.as_str().map_or(true, str::is_empty) {
            result.error(format!("{prefix}.rule_id"), "rule_id must be a non-empty string");
        }
    }

    check_enum(obj, "category", CATEGORIES, &prefix, result);

    let levels: Vec<&str> = Severity::ALL.iter().map(|s| s.as_str()).collect();
    check_enum(obj, "risk_level", &levels, &prefix, result);

    if let Some(action) = obj.get("action") {
        if action.as_str().map_or(true, |a| a.trim().is_empty()) {
            result.error(format!("{prefix}.action"), "action must be a non-empty string");
        }
    }

    validate_direction(obj, &prefix, result);
    validate_hops(obj, &prefix, result);

    match obj.get("conditions") {
        Some(Value::Array(conditions)) => validate_conditions(conditions, &prefix, result),
        Some(_) => result.error(format!("{prefix}.conditions"), "'conditions' must be an array"),
        None => {}
    }
}

fn check_enum(obj: &Map<String, Value>, field: &str, allowed: &[&str], prefix: &str, result: &mut ValidationResult) {
    let Some(value) = obj.get(field) else { return };
    let path = format!("{prefix}.{field}");
    match value.as_str() {
        Some(s) if allowed.contains(&s) => {}
        Some(s) => result.error_with_suggestion(
            path,
            format!("invalid {field} '{s}'. Valid: {}", allowed.join(", ")),
            fuzzy_match(s, allowed),
        ),
        None => result.error(path, format!("{field} must be a string")),
    }
}

fn validate_direction(obj: &Map<String, Value>, prefix: &str, result: &mut ValidationResult) {
    let Some(value) = obj.get("direction") else { return };
    let path = format!("{prefix}.direction");
    match value {
        Value::Null => {}
        Value::String(s) if s.is_empty() || s.parse::<FlowDirection>().is_ok() => {}
        other => result.error(
            path,
            format!("direction must be 'inflow' or 'outflow', got {other}"),
        ),
    }
}

fn validate_hops(obj: &Map<String, Value>, prefix: &str, result: &mut ValidationResult) {
    let mut bound = |field: &str| -> Option<u64> {
        match obj.get(field) {
            None | Some(Value::Null) => None,
            Some(v) => match v.as_u64() {
                Some(n) => Some(n),
                None => {
                    result.error(format!("{prefix}.{field}"), format!("{field} must be a non-negative integer"));
                    None
                }
            },
        }
    };
    let min = bound("min_hops");
    let max = bound("max_hops");

    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            result.error(
                format!("{prefix}.min_hops"),
                format!("min_hops ({min}) must not exceed max_hops ({max})"),
            );
        }
    }
    if max == Some(0) {
        result.warn(format!("{prefix}.max_hops"), "max_hops 0 excludes every counterparty");
    }
}

// ── Condition checks ────────────────────────────────────────────────

fn validate_conditions(conditions: &[Value], prefix: &str, result: &mut ValidationResult) {
    if conditions.is_empty() {
        result.error(format!("{prefix}.conditions"), "conditions must not be empty");
        return;
    }

    let mut tag_conditions = 0usize;
    for (j, cond) in conditions.iter().enumerate() {
        let cprefix = format!("{prefix}.conditions[{j}]");
        let Some(obj) = cond.as_object() else {
            result.error(cprefix, "condition must be a JSON object");
            continue;
        };

        for field in CONDITION_FIELDS {
            if !obj.contains_key(*field) {
                result.error(format!("{cprefix}.{field}"), format!("missing required field '{field}'"));
            }
        }

        let operator = obj.get("operator").and_then(Value::as_str);
        if let Some(op) = operator {
            if !OPERATORS.contains(&op) {
                result.error_with_suggestion(
                    format!("{cprefix}.operator"),
                    format!("invalid operator '{op}'"),
                    fuzzy_match(op, OPERATORS),
                );
            }
        }

        let Some(raw_param) = obj.get("parameter").and_then(Value::as_str) else {
            if obj.contains_key("parameter") {
                result.error(format!("{cprefix}.parameter"), "parameter must be a string");
            }
            continue;
        };

        let parameter = Parameter::from(raw_param.to_string());
        match parameter.tier() {
            Tier::Node | Tier::Target => {
                tag_conditions += 1;
                let dimension = parameter
                    .dimension_for(parameter.tier())
                    .unwrap_or(TagDimension::PrimaryCategory);
                if let Some(op) = operator {
                    check_tag_operator(dimension, op, obj.get("value"), &cprefix, result);
                }
            }
            Tier::Narrative => check_narrative_parameter(raw_param, &cprefix, result),
        }
    }

    if tag_conditions == 0 {
        result.warn(
            format!("{prefix}.conditions"),
            "no tag conditions: the rule is only judged downstream and never appears in rules_triggered",
        );
    }
}

fn check_tag_operator(
    dimension: TagDimension,
    op: &str,
    value: Option<&Value>,
    cprefix: &str,
    result: &mut ValidationResult,
) {
    let operator = Operator::from(op.to_string());
    if matches!(operator, Operator::Unsupported(_)) {
        result.error(
            format!("{cprefix}.operator"),
            format!("operator '{op}' cannot be applied to tag field '{dimension}'"),
        );
        return;
    }
    if !supports_operator(dimension, &operator) {
        result.warn(
            format!("{cprefix}.operator"),
            format!("operator '{op}' is not supported for '{dimension}' and never matches"),
        );
    }

    let Some(value) = value else { return };
    match (&operator, value) {
        (Operator::In | Operator::NotIn, Value::Array(items)) => {
            if items.iter().any(|v| !v.is_string()) {
                result.error(format!("{cprefix}.value"), format!("'{op}' value must be an array of strings"));
            }
        }
        (Operator::In | Operator::NotIn, Value::String(_)) => result.warn(
            format!("{cprefix}.value"),
            format!("'{op}' expects an array; a single string is treated as a one-element set"),
        ),
        (Operator::Eq | Operator::Ne, Value::String(_)) => {}
        _ => result.error(
            format!("{cprefix}.value"),
            format!("value type does not fit operator '{op}' on tag field '{dimension}'"),
        ),
    }
}

/// `path.node.tags.<typo>` is a tag condition the engine can never read.
fn check_unknown_tag_parameter(raw: &str, cprefix: &str, result: &mut ValidationResult) {
    for prefix in TAG_PREFIXES {
        if let Some(field) = raw.strip_prefix(prefix) {
            let fields: Vec<&str> = TagDimension::ALL.iter().map(|d| d.field_name()).collect();
            let suggestion = fuzzy_match(field, &fields).map(|f| format!("{prefix}{f}"));
            result.error_with_suggestion(
                format!("{cprefix}.parameter"),
                format!("invalid parameter '{raw}': unknown tag field '{field}'"),
                suggestion.as_deref(),
            );
            return;
        }
    }
    if raw.is_empty() {
        result.error(format!("{cprefix}.parameter"), "parameter must not be empty");
    }
}

/// Known narrative parameters pass; a near miss of one is a typo; anything
/// else is left to the downstream reviewer with a warning.
fn check_narrative_parameter(raw: &str, cprefix: &str, result: &mut ValidationResult) {
    if raw.is_empty() || TAG_PREFIXES.iter().any(|p| raw.starts_with(p)) {
        check_unknown_tag_parameter(raw, cprefix, result);
        return;
    }
    if NARRATIVE_PARAMETERS.contains(&raw) {
        return;
    }

    let nearest = NARRATIVE_PARAMETERS
        .iter()
        .map(|known| (*known, levenshtein(raw, known)))
        .min_by_key(|(_, dist)| *dist);
    match nearest {
        Some((known, dist)) if dist <= NARRATIVE_TYPO_DISTANCE => result.error_with_suggestion(
            format!("{cprefix}.parameter"),
            format!("invalid parameter '{raw}'"),
            Some(known),
        ),
        _ => result.warn(
            format!("{cprefix}.parameter"),
            format!("unrecognised narrative parameter '{raw}' is passed downstream unchecked"),
        ),
    }
}

// ── Document-level checks ───────────────────────────────────────────

pub(super) fn validate_rule_id_uniqueness(rules: &[Value], result: &mut ValidationResult) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (i, rule) in rules.iter().enumerate() {
        let Some(id) = rule.get("rule_id").and_then(Value::as_str) else {
            continue;
        };
        if let Some(first) = seen.get(id) {
            result.error(
                format!("[{i}].rule_id"),
                format!("Duplicate rule_id '{id}' at indices {first} and {i}"),
            );
        } else {
            seen.insert(id, i);
        }
    }
}
