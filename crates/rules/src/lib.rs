//! Rule set handling for address screening.
//!
//! This crate provides:
//! - JSON rule document loading with scenario scoping
//! - Tri-state condition evaluation over node and target tag tiers
//! - Direction / hop-range applicability checks
//! - Structured rule validation against the authoring schema and label vocabulary

pub mod evaluator;
pub mod loader;
pub mod validation;

pub use evaluator::{rule_applies, ConditionOutcome, RuleEvaluator};
pub use loader::RuleSet;
pub use validation::{
    validate_rules, validate_rules_file, validate_rules_str, LabelVocabulary, ValidationResult,
};
