use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::direction::{FlowDirection, TraceDirection};

/// Named business context that narrows which rules and paths are considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Onboarding,
    Deposit,
    Withdrawal,
    Cdd,
    Monitoring,
    #[default]
    All,
}

impl Scenario {
    pub const ALL: [Scenario; 6] = [
        Scenario::Onboarding,
        Scenario::Deposit,
        Scenario::Withdrawal,
        Scenario::Cdd,
        Scenario::Monitoring,
        Scenario::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::Onboarding => "onboarding",
            Scenario::Deposit => "deposit",
            Scenario::Withdrawal => "withdrawal",
            Scenario::Cdd => "cdd",
            Scenario::Monitoring => "monitoring",
            Scenario::All => "all",
        }
    }

    /// Rule categories in scope; `None` applies every rule.
    ///
    /// Onboarding screens a prospective depositor, so it reuses the deposit rules.
    pub fn categories(self) -> Option<&'static [&'static str]> {
        match self {
            Scenario::Onboarding | Scenario::Deposit => Some(&["Deposit"]),
            Scenario::Withdrawal => Some(&["Withdrawal"]),
            Scenario::Cdd => Some(&["CDD"]),
            Scenario::Monitoring => Some(&["Ongoing Monitoring"]),
            Scenario::All => None,
        }
    }

    /// Path directions walked; `None` walks both.
    pub fn path_directions(self) -> Option<&'static [FlowDirection]> {
        match self {
            Scenario::Withdrawal => Some(&[FlowDirection::Outflow]),
            _ => None,
        }
    }

    pub fn allows_category(self, category: &str) -> bool {
        self.categories().map_or(true, |cats| cats.contains(&category))
    }

    /// Whether a path with the given direction is walked. Paths with an
    /// unrecognised direction are excluded whenever a policy is active.
    pub fn allows_path(self, direction: Option<FlowDirection>) -> bool {
        match (self.path_directions(), direction) {
            (None, _) => true,
            (Some(allowed), Some(d)) => allowed.contains(&d),
            (Some(_), None) => false,
        }
    }

    /// Default trace direction requested from the provider for this scenario.
    pub fn default_trace_direction(self) -> TraceDirection {
        match self {
            Scenario::Withdrawal => TraceDirection::Outflow,
            _ => TraceDirection::All,
        }
    }

    /// Categories as reported in the screening summary.
    pub fn categories_label(self) -> Vec<String> {
        match self.categories() {
            Some(cats) => cats.iter().map(|c| c.to_string()).collect(),
            None => vec!["ALL".to_string()],
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sc| sc.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|sc| sc.as_str()).collect();
                format!("unknown scenario: '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}
