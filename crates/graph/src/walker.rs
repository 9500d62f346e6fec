//! Single-pass path walker and per-address aggregation.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use aml_core::{GraphDocument, Path, Rule, Scenario, TagSnapshot};
use aml_rules::RuleEvaluator;

use crate::evidence::format_flow;
use crate::hops::hop_distance;
use crate::tags::prioritize_tag;

/// Evidence samples kept per address. `occurrences` is never capped.
pub const MAX_EVIDENCE_PATHS: usize = 3;

// ── Output types ────────────────────────────────────────────────────

/// Aggregated risk record for one counterparty address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub address: String,
    /// Smallest hop distance at which the address was flagged.
    pub min_deep: usize,
    /// Prioritised tag of the first flagged occurrence.
    pub tag: TagSnapshot,
    pub matched_rules: BTreeSet<String>,
    pub evidence_paths: Vec<EvidencePath>,
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidencePath {
    pub path_index: usize,
    pub deep: usize,
    pub flow: String,
}

/// Findings in first-seen order plus the walk counters the summary needs.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    pub findings: Vec<Finding>,
    pub total_paths: usize,
    pub paths_direction_filtered: usize,
}

// ── Walker ──────────────────────────────────────────────────────────

/// Walks every path of a graph document against an already scoped rule list.
pub struct PathWalker<'a> {
    target: &'a str,
    rules: &'a [&'a Rule],
    scenario: Scenario,
    max_depth: usize,
}

impl<'a> PathWalker<'a> {
    pub fn new(target: &'a str, rules: &'a [&'a Rule], scenario: Scenario, max_depth: usize) -> Self {
        Self {
            target,
            rules,
            scenario,
            max_depth,
        }
    }

    pub fn walk(&self, document: &GraphDocument) -> WalkOutcome {
        let paths = document.paths();
        let mut findings: IndexMap<String, Finding> = IndexMap::new();
        let mut filtered = 0usize;

        for (path_index, path) in paths.iter().enumerate() {
            if path.nodes.is_empty() {
                continue;
            }
            let direction = path.flow();
            if !self.scenario.allows_path(direction) {
                debug!(path_index, direction = path.direction, scenario = %self.scenario, "path filtered by scenario");
                filtered += 1;
                continue;
            }
            if direction.is_none() {
                warn!(path_index, direction = path.direction, "skipping path with unknown direction code");
                continue;
            }
            self.walk_path(path_index, path, &mut findings);
        }

        debug!(
            paths = paths.len(),
            filtered,
            findings = findings.len(),
            "path walk complete"
        );

        WalkOutcome {
            findings: findings.into_values().collect(),
            total_paths: paths.len(),
            paths_direction_filtered: filtered,
        }
    }

    fn walk_path(&self, path_index: usize, path: &Path, findings: &mut IndexMap<String, Finding>) {
        let Some(direction) = path.flow() else { return };
        let node_count = path.nodes.len();

        for (index, node) in path.nodes.iter().enumerate() {
            let address = node.address();
            if address == self.target {
                continue;
            }

            let deep = hop_distance(index, node_count, direction);
            if deep < 1 || deep > self.max_depth {
                continue;
            }

            let Some(tag) = prioritize_tag(&node.tags) else {
                continue;
            };

            let matched: Vec<&str> = self
                .rules
                .iter()
                .filter(|rule| RuleEvaluator::node_matches(rule, direction, deep, tag))
                .map(|rule| rule.rule_id.as_str())
                .collect();
            if matched.is_empty() {
                continue;
            }
            debug!(path_index, address, deep, rules = ?matched, "node flagged");

            let finding = findings.entry(address.to_string()).or_insert_with(|| Finding {
                address: address.to_string(),
                min_deep: deep,
                tag: TagSnapshot::from(tag),
                matched_rules: BTreeSet::new(),
                evidence_paths: Vec::new(),
                occurrences: 0,
            });
            finding.matched_rules.extend(matched.into_iter().map(str::to_string));
            finding.min_deep = finding.min_deep.min(deep);
            finding.occurrences += 1;
            if finding.evidence_paths.len() < MAX_EVIDENCE_PATHS {
                finding.evidence_paths.push(EvidencePath {
                    path_index,
                    deep,
                    flow: format_flow(&path.nodes, index, direction),
                });
            }
        }
    }
}
