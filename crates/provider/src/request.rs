use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use aml_core::TraceDirection;

use crate::error::ProviderError;

/// Chains the provider can investigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    Tron,
    Ethereum,
    Bitcoin,
    Solana,
}

impl Chain {
    pub const ALL: [Chain; 4] = [Chain::Tron, Chain::Ethereum, Chain::Bitcoin, Chain::Solana];

    /// Name as the provider expects it in `chain_name`.
    pub fn as_str(self) -> &'static str {
        match self {
            Chain::Tron => "Tron",
            Chain::Ethereum => "Ethereum",
            Chain::Bitcoin => "Bitcoin",
            Chain::Solana => "Solana",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = ProviderError;

    /// Case-insensitive; the canonical spelling is always sent upstream.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chain::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProviderError::UnsupportedChain(s.to_string()))
    }
}

/// Parameters of one graph investigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub chain: Chain,
    pub address: String,
    /// Recorded in the saved envelope; the provider always traces both sides
    /// up to the requested hop counts.
    pub direction: TraceDirection,
    pub inflow_hops: u32,
    pub outflow_hops: u32,
    pub max_nodes_per_hop: u32,
    pub min_timestamp: Option<i64>,
    pub max_timestamp: Option<i64>,
}

impl FetchRequest {
    pub const DEFAULT_HOPS: u32 = 3;
    pub const DEFAULT_MAX_NODES_PER_HOP: u32 = 100;

    pub fn new(chain: Chain, address: impl Into<String>) -> Self {
        Self {
            chain,
            address: address.into(),
            direction: TraceDirection::All,
            inflow_hops: Self::DEFAULT_HOPS,
            outflow_hops: Self::DEFAULT_HOPS,
            max_nodes_per_hop: Self::DEFAULT_MAX_NODES_PER_HOP,
            min_timestamp: None,
            max_timestamp: None,
        }
    }

    /// Deepest hop requested on either side.
    pub fn max_hops(&self) -> u32 {
        self.inflow_hops.max(self.outflow_hops)
    }

    /// Body of the `submit_task` call. Time bounds are only sent when set.
    pub fn submit_payload(&self) -> Value {
        let mut payload = json!({
            "chain_name": self.chain.as_str(),
            "address": self.address,
            "inflow_hops": self.inflow_hops,
            "outflow_hops": self.outflow_hops,
            "max_nodes_per_hop": self.max_nodes_per_hop,
        });
        if let Some(obj) = payload.as_object_mut() {
            if let Some(min) = self.min_timestamp.filter(|t| *t != 0) {
                obj.insert("min_timestamp".into(), json!(min));
            }
            if let Some(max) = self.max_timestamp.filter(|t| *t != 0) {
                obj.insert("max_timestamp".into(), json!(max));
            }
        }
        payload
    }
}
