//! Human-readable fund-flow strings for findings.

use aml_core::{FlowDirection, Node};

use crate::tags::prioritize_tag;

const UNKNOWN_ADDRESS: &str = "Unknown";

/// Render the sub-path between the flagged node and the target.
///
/// Inflow keeps `[flagged..]` (funds travelling towards the target), outflow
/// keeps `[..=flagged]`. Every arrow carries the amount of the node it enters:
///
/// ```text
/// [TTarget] --(1500 USD)--> [TMid] --(900 USD)--> [TBad (Gambling)]
/// ```
pub fn format_flow(nodes: &[Node], flagged: usize, direction: FlowDirection) -> String {
    let slice = match direction {
        FlowDirection::Inflow => nodes.get(flagged..),
        FlowDirection::Outflow => nodes.get(..=flagged),
    }
    .unwrap_or_default();

    let mut parts = Vec::with_capacity(slice.len() * 2);
    for (i, node) in slice.iter().enumerate() {
        if i > 0 {
            let amount = node
                .amount
                .as_ref()
                .map(|a| a.to_string())
                .unwrap_or_else(|| "0".to_string());
            parts.push(format!("--({amount} USD)-->"));
        }
        parts.push(render_hop(node));
    }
    parts.join(" ")
}

fn render_hop(node: &Node) -> String {
    let address = node.address.as_deref().unwrap_or(UNKNOWN_ADDRESS);
    match prioritize_tag(&node.tags).and_then(|t| t.label()) {
        Some(label) => format!("[{address} ({label})]"),
        None => format!("[{address}]"),
    }
}
