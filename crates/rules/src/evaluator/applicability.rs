//! Direction and hop-range gating for node-tier rules.

use aml_core::{FlowDirection, Rule};

/// Whether `rule` may be evaluated for a node `hops` away on a path flowing in `direction`.
///
/// Undeclared constraints match anything. A declared direction the engine
/// does not recognise matches nothing.
pub fn rule_applies(rule: &Rule, direction: FlowDirection, hops: usize) -> bool {
    match rule.flow_direction() {
        Some(Ok(required)) if required != direction => return false,
        Some(Err(_)) => return false,
        _ => {}
    }

    let hops = hops as i64;
    if rule.min_hops.is_some_and(|min| hops < min) {
        return false;
    }
    if rule.max_hops.is_some_and(|max| hops > max) {
        return false;
    }
    true
}
