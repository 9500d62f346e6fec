//! Core [`RuleSet`] struct: the loaded rule document plus scenario scoping.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};

use aml_core::rule::load_rules;
use aml_core::{Result, Rule, Scenario};

/// An ordered, read-only collection of rules.
///
/// Document order is preserved; it decides the order in which rules are tried
/// but never the content of the output, which is always sorted.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        let mut seen = HashSet::with_capacity(rules.len());
        for rule in &rules {
            if !seen.insert(rule.rule_id.as_str()) {
                warn!(rule_id = %rule.rule_id, "duplicate rule_id in rule document");
            }
        }
        Self { rules }
    }

    /// Read a rule document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let rules = load_rules(path)?;
        info!(count = rules.len(), path = %path.display(), "loaded rules");
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, rule_id: &str) -> Option<&Rule> {
        self.rules.iter().rev().find(|r| r.rule_id == rule_id)
    }

    /// Rules whose category is in scope for `scenario`, in document order.
    pub fn for_scenario(&self, scenario: Scenario) -> Vec<&Rule> {
        let scoped: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|r| scenario.allows_category(&r.category))
            .collect();
        debug!(
            scenario = %scenario,
            loaded = scoped.len(),
            available = self.rules.len(),
            "scoped rules to scenario"
        );
        scoped
    }
}
