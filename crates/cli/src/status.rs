//! One-line JSON status records printed on stdout by `extract`.

use std::fmt::Display;
use std::path::Path;

use serde::Serialize;

use aml_core::Scenario;
use aml_graph::ScreeningReport;

#[derive(Debug, Serialize)]
pub struct SuccessLine {
    pub status: &'static str,
    pub output: String,
    pub count: usize,
    pub scenario: Scenario,
    pub target_self_hits: usize,
}

impl SuccessLine {
    pub fn new(output: &Path, report: &ScreeningReport) -> Self {
        Self {
            status: "success",
            output: output.display().to_string(),
            count: report.count(),
            scenario: report.scenario,
            target_self_hits: report.target_self_hits(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorLine {
    pub error: String,
}

impl ErrorLine {
    pub fn new(err: impl Display) -> Self {
        Self { error: err.to_string() }
    }
}

/// Compact single-line JSON.
pub fn render<T: Serialize>(line: &T) -> String {
    serde_json::to_string(line).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}
