//! Rule document types.
//!
//! Rule files are produced and schema-checked by the authoring tooling, so
//! parsing here is deliberately lenient: unknown parameters and operators are
//! kept as-is and simply never match, rather than failing the whole document.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::direction::FlowDirection;
use crate::document::read_json;
use crate::error::{InputKind, Result};
use crate::lenient::non_empty_string;
use crate::severity::Severity;
use crate::tag::TagDimension;

/// A declarative risk policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub rule_id: String,
    /// Business scenario classification (`Deposit`, `Withdrawal`, ...).
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub action: String,
    /// Absent or empty means the rule applies to both directions.
    #[serde(default, deserialize_with = "non_empty_string", skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_hops: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hops: Option<i64>,
    /// Combined with AND semantics.
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Descriptive fields (`name`, `description`, `reference`, ...) carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Rule {
    /// Declared severity, `Low` when missing or unrecognised.
    pub fn severity(&self) -> Severity {
        Severity::parse_lenient(&self.risk_level).unwrap_or(Severity::Low)
    }

    /// The direction constraint, if any.
    ///
    /// `Some(Err(raw))` marks a declared but unrecognised direction, which
    /// matches no path.
    pub fn flow_direction(&self) -> Option<std::result::Result<FlowDirection, &str>> {
        self.direction
            .as_deref()
            .map(|raw| raw.parse().map_err(|_| raw))
    }

    /// True when at least one condition is evaluable at the given tier.
    pub fn has_conditions_for(&self, tier: Tier) -> bool {
        self.conditions.iter().any(|c| c.parameter.tier() == tier)
    }
}

/// Load a rule document (a JSON array of rules).
pub fn load_rules(path: &Path) -> Result<Vec<Rule>> {
    read_json(InputKind::Rules, path)
}

/// One predicate inside a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub parameter: Parameter,
    #[serde(default)]
    pub operator: Operator,
    #[serde(default)]
    pub value: ConditionValue,
}

// ── Parameters ──────────────────────────────────────────────────────

/// The evaluation level a condition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Tags of a counterparty node visited along a path.
    Node,
    /// The investigated address's own tags.
    Target,
    /// Anything else; judged by the downstream report writer.
    Narrative,
}

const NODE_TAG_PREFIX: &str = "path.node.tags.";
const TARGET_TAG_PREFIX: &str = "target.tags.";

/// A condition parameter, e.g. `path.node.tags.risk_level`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Parameter {
    NodeTag(TagDimension),
    TargetTag(TagDimension),
    Other(String),
}

impl Parameter {
    pub fn tier(&self) -> Tier {
        match self {
            Parameter::NodeTag(_) => Tier::Node,
            Parameter::TargetTag(_) => Tier::Target,
            Parameter::Other(_) => Tier::Narrative,
        }
    }

    /// The tag dimension this parameter reads, when evaluable at `tier`.
    pub fn dimension_for(&self, tier: Tier) -> Option<TagDimension> {
        match (self, tier) {
            (Parameter::NodeTag(d), Tier::Node) | (Parameter::TargetTag(d), Tier::Target) => Some(*d),
            _ => None,
        }
    }
}

impl Default for Parameter {
    fn default() -> Self {
        Parameter::Other(String::new())
    }
}

impl From<String> for Parameter {
    fn from(raw: String) -> Self {
        let tagged = |prefix: &str| raw.strip_prefix(prefix).and_then(TagDimension::from_field_name);
        if let Some(d) = tagged(NODE_TAG_PREFIX) {
            Parameter::NodeTag(d)
        } else if let Some(d) = tagged(TARGET_TAG_PREFIX) {
            Parameter::TargetTag(d)
        } else {
            Parameter::Other(raw)
        }
    }
}

impl From<Parameter> for String {
    fn from(p: Parameter) -> Self {
        p.to_string()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::NodeTag(d) => write!(f, "{}{}", NODE_TAG_PREFIX, d),
            Parameter::TargetTag(d) => write!(f, "{}{}", TARGET_TAG_PREFIX, d),
            Parameter::Other(raw) => f.write_str(raw),
        }
    }
}

// ── Operators ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Eq,
    Ne,
    In,
    NotIn,
    Unsupported(String),
}

impl Default for Operator {
    fn default() -> Self {
        Operator::Unsupported(String::new())
    }
}

impl From<String> for Operator {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "==" => Operator::Eq,
            "!=" => Operator::Ne,
            "IN" => Operator::In,
            "NOT_IN" => Operator::NotIn,
            _ => Operator::Unsupported(raw),
        }
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Eq => f.write_str("=="),
            Operator::Ne => f.write_str("!="),
            Operator::In => f.write_str("IN"),
            Operator::NotIn => f.write_str("NOT_IN"),
            Operator::Unsupported(raw) => f.write_str(raw),
        }
    }
}

// ── Values ──────────────────────────────────────────────────────────

/// Right-hand side of a condition: a scalar string, a list of strings, or
/// anything else (numbers, objects), which tag comparisons never match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Scalar(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

impl Default for ConditionValue {
    fn default() -> Self {
        ConditionValue::Other(serde_json::Value::Null)
    }
}

impl ConditionValue {
    /// `==` semantics: only a scalar string can be equal to a tag value.
    pub fn equals(&self, actual: &str) -> bool {
        matches!(self, ConditionValue::Scalar(s) if s == actual)
    }

    /// Set membership. A scalar is treated as a one-element set;
    /// `None` when the value is not a string set at all.
    pub fn contains(&self, actual: &str) -> Option<bool> {
        match self {
            ConditionValue::Scalar(s) => Some(s == actual),
            ConditionValue::List(items) => Some(items.iter().any(|v| v == actual)),
            ConditionValue::Other(_) => None,
        }
    }

    /// All string members, for vocabulary checks.
    pub fn strings(&self) -> Vec<&str> {
        match self {
            ConditionValue::Scalar(s) => vec![s.as_str()],
            ConditionValue::List(items) => items.iter().map(String::as_str).collect(),
            ConditionValue::Other(_) => Vec::new(),
        }
    }
}
