//! End-to-end screening entry point and report persistence.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use aml_core::config::DEFAULT_MAX_DEPTH;
use aml_core::{write_json_atomic, GraphDocument, Result, Rule, Scenario, TagSnapshot};
use aml_rules::RuleSet;

use crate::summary::{highest_severity, sort_findings, Summary};
use crate::target::{evaluate_target, TargetFinding};
use crate::walker::{Finding, PathWalker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenOptions {
    pub max_depth: usize,
    pub scenario: Scenario,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH as usize,
            scenario: Scenario::All,
        }
    }
}

/// The investigated address as it appears in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetBlock {
    pub chain: String,
    pub address: String,
    pub tags: Vec<TagSnapshot>,
    pub self_matched_rules: BTreeSet<String>,
}

/// Machine-readable evidence bundle for one screening run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningReport {
    pub target: TargetBlock,
    pub scenario: Scenario,
    pub summary: Summary,
    pub risk_entities: Vec<Finding>,
    /// Per-tag detail behind `target.self_matched_rules`.
    #[serde(skip)]
    pub target_findings: Vec<TargetFinding>,
}

impl ScreeningReport {
    pub fn count(&self) -> usize {
        self.risk_entities.len()
    }

    /// Distinct rules hit by the target's own tags.
    pub fn target_self_hits(&self) -> usize {
        self.target.self_matched_rules.len()
    }
}

/// Screen a graph document against a rule set.
///
/// Pure: the same document, rules and options always give the same report.
pub fn screen(document: &GraphDocument, rules: &RuleSet, options: ScreenOptions) -> ScreeningReport {
    let scenario = options.scenario;
    let scoped: Vec<&Rule> = rules.for_scenario(scenario);

    let target_findings = evaluate_target(&scoped, document.target_tags());
    let self_matched_rules: BTreeSet<String> = target_findings
        .iter()
        .flat_map(|f| f.matched_rules.iter().cloned())
        .collect();

    let walk = PathWalker::new(&document.address, &scoped, scenario, options.max_depth).walk(document);
    let mut findings = walk.findings;
    sort_findings(&mut findings);

    let rules_triggered: BTreeSet<String> = findings
        .iter()
        .flat_map(|f| f.matched_rules.iter().cloned())
        .chain(self_matched_rules.iter().cloned())
        .collect();
    let severity = highest_severity(&findings, &rules_triggered, &scoped);

    let summary = Summary {
        scenario,
        categories_applied: scenario.categories_label(),
        total_paths_analyzed: walk.total_paths,
        paths_direction_filtered: walk.paths_direction_filtered,
        unique_risk_entities: findings.len(),
        rules_loaded: scoped.len(),
        rules_total_available: rules.len(),
        rules_triggered,
        highest_severity: severity,
    };

    info!(
        address = %document.address,
        scenario = %scenario,
        findings = summary.unique_risk_entities,
        target_hits = self_matched_rules.len(),
        highest_severity = %severity,
        "screening complete"
    );

    ScreeningReport {
        target: TargetBlock {
            chain: document.chain.clone(),
            address: document.address.clone(),
            tags: document.target_tags().iter().map(TagSnapshot::from).collect(),
            self_matched_rules,
        },
        scenario,
        summary,
        risk_entities: findings,
        target_findings,
    }
}

/// `<output_dir>/risk_paths_<stem>.json`, where the stem drops `.json` and the
/// `raw_graph_` prefix from the graph file name.
pub fn output_path(output_dir: &Path, graph_path: &Path) -> PathBuf {
    let name = graph_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.replace(".json", "").replace("raw_graph_", "");
    output_dir.join(format!("risk_paths_{stem}.json"))
}

/// Write the report as pretty JSON, atomically, creating the parent directory when needed.
pub fn write_report(report: &ScreeningReport, path: &Path) -> Result<()> {
    write_json_atomic(path, report)?;
    info!(path = %path.display(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn output_name_strips_prefix_and_extension() {
        let out = output_path(
            Path::new("graph_data"),
            Path::new("/tmp/raw_graph_TXyz_20250101_120000.json"),
        );
        assert_eq!(out, PathBuf::from("graph_data/risk_paths_TXyz_20250101_120000.json"));

        let out = output_path(Path::new("out"), Path::new("sample.json"));
        assert_eq!(out, PathBuf::from("out/risk_paths_sample.json"));
    }

    #[test]
    fn write_creates_directory_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("risk_paths_x.json");
        let report = screen(&GraphDocument::default(), &RuleSet::default(), ScreenOptions::default());

        write_report(&report, &path).unwrap();

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["summary"]["highest_severity"], "Low");
        assert_eq!(written["summary"]["categories_applied"][0], "ALL");
        assert!(!dir.path().join("nested").join("risk_paths_x.json.tmp").exists());
    }
}
