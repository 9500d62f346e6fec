//! The saved raw-graph envelope.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeDelta};
use serde::Serialize;
use serde_json::Value;

use aml_core::{write_json_atomic, GraphData, GraphDocument, Result, TraceDirection};

use crate::error::ProviderError;
use crate::request::{Chain, FetchRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HopsRequested {
    pub inflow: u32,
    pub outflow: u32,
}

/// Provider payload wrapped with the request that produced it.
///
/// Serialises to the graph document shape the screening engine reads, plus
/// acquisition metadata the engine ignores.
#[derive(Debug, Clone, Serialize)]
pub struct FetchedGraph {
    pub chain: Chain,
    pub address: String,
    pub direction: TraceDirection,
    pub hops_requested: HopsRequested,
    pub timestamp: String,
    pub execution_time: String,
    /// Provider response `{code, msg, data}` with `data` decoded to an object.
    pub graph_data: Value,
    #[serde(skip)]
    pub fetched_at: DateTime<Local>,
}

impl FetchedGraph {
    pub fn new(request: &FetchRequest, graph_data: Value, started: DateTime<Local>, finished: DateTime<Local>) -> Self {
        Self {
            chain: request.chain,
            address: request.address.clone(),
            direction: request.direction,
            hops_requested: HopsRequested {
                inflow: request.inflow_hops,
                outflow: request.outflow_hops,
            },
            timestamp: finished.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            execution_time: format_elapsed(finished - started),
            graph_data,
            fetched_at: finished,
        }
    }

    /// Parse the envelope into the engine's document model.
    pub fn document(&self) -> std::result::Result<GraphDocument, ProviderError> {
        let graph_data: GraphData = serde_json::from_value(self.graph_data.clone())
            .map_err(|e| ProviderError::Parse(format!("graph_data: {e}")))?;
        Ok(GraphDocument {
            chain: self.chain.to_string(),
            address: self.address.clone(),
            graph_data,
        })
    }

    /// Save to `<output_dir>/raw_graph_<address>_<YYYYmmdd_HHMMSS>.json`.
    pub fn save(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = raw_graph_path(output_dir, &self.address, self.fetched_at);
        write_json_atomic(&path, self)?;
        Ok(path)
    }
}

pub fn raw_graph_path(output_dir: &Path, address: &str, at: DateTime<Local>) -> PathBuf {
    output_dir.join(format!("raw_graph_{}_{}.json", address, at.format("%Y%m%d_%H%M%S")))
}

/// `H:MM:SS.ffffff`, e.g. `0:00:07.250000`.
fn format_elapsed(elapsed: TimeDelta) -> String {
    let micros = elapsed.num_microseconds().unwrap_or(0).max(0);
    let secs = micros / 1_000_000;
    format!(
        "{}:{:02}:{:02}.{:06}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        micros % 1_000_000
    )
}
