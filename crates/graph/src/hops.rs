//! Hop distance between the target and a node, derived from its position.

use aml_core::FlowDirection;

/// Transfers between the target and the node at `index` of a path with
/// `node_count` nodes.
///
/// Inflow paths end at the target (`[source, ..., target]`), outflow paths
/// start at it (`[target, ..., destination]`). Any distance reported by the
/// provider is ignored in favour of this positional value.
pub fn hop_distance(index: usize, node_count: usize, direction: FlowDirection) -> usize {
    match direction {
        FlowDirection::Inflow => node_count.saturating_sub(index + 1),
        FlowDirection::Outflow => index,
    }
}
