use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Direction of fund movement relative to the investigated address.
///
/// Provider paths encode this as an integer: `-1` for inflow, `1` for outflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    Inflow,
    Outflow,
}

impl FlowDirection {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(FlowDirection::Inflow),
            1 => Some(FlowDirection::Outflow),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            FlowDirection::Inflow => -1,
            FlowDirection::Outflow => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlowDirection::Inflow => "inflow",
            FlowDirection::Outflow => "outflow",
        }
    }
}

impl fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inflow" => Ok(FlowDirection::Inflow),
            "outflow" => Ok(FlowDirection::Outflow),
            other => Err(format!("unknown flow direction: '{}'", other)),
        }
    }
}

/// Which side of the graph to trace when requesting data from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceDirection {
    Inflow,
    Outflow,
    All,
}

impl TraceDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TraceDirection::Inflow => "inflow",
            TraceDirection::Outflow => "outflow",
            TraceDirection::All => "all",
        }
    }
}

impl fmt::Display for TraceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraceDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inflow" => Ok(TraceDirection::Inflow),
            "outflow" => Ok(TraceDirection::Outflow),
            "all" => Ok(TraceDirection::All),
            other => Err(format!("unknown trace direction: '{}' (expected inflow, outflow or all)", other)),
        }
    }
}
