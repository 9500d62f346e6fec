//! Risk-path extraction over a provider transaction graph.
//!
//! Walks every path of a [`GraphDocument`](aml_core::GraphDocument), normalises
//! hop distances relative to the target, matches counterparties against the
//! scenario-scoped rule set and aggregates one [`Finding`] per address. The
//! target's own tags are screened separately. Everything here is synchronous
//! and deterministic: the same inputs always produce byte-identical reports.

pub mod evidence;
pub mod hops;
pub mod report;
pub mod summary;
pub mod tags;
pub mod target;
pub mod walker;

pub use evidence::format_flow;
pub use hops::hop_distance;
pub use report::{output_path, screen, write_report, ScreenOptions, ScreeningReport, TargetBlock};
pub use summary::{highest_severity, sort_findings, Summary};
pub use tags::prioritize_tag;
pub use target::{evaluate_target, TargetFinding};
pub use walker::{EvidencePath, Finding, PathWalker, WalkOutcome, MAX_EVIDENCE_PATHS};
