use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordinal risk ranking: `Severe > High > Medium > Low`.
///
/// The derived `Ord` follows declaration order, so the *smallest* value is the
/// most severe. Use [`Severity::rank`] when sorting findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Severe,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Severity::Severe, Severity::High, Severity::Medium, Severity::Low];

    /// Sort rank: `severe=0, high=1, medium=2, low=3`.
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Case-insensitive parse; `None` for anything outside the four levels.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "severe" => Some(Severity::Severe),
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            _ => None,
        }
    }

    /// Rank of a free-form risk level string; unknown levels rank as `Low`.
    pub fn rank_of(s: &str) -> u8 {
        Self::parse_lenient(s).unwrap_or(Severity::Low).rank()
    }

    pub fn is_more_severe_than(self, other: Severity) -> bool {
        self.rank() < other.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Severe => "Severe",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s).ok_or_else(|| format!("unknown risk level: '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_severity() {
        assert_eq!(Severity::rank_of("severe"), 0);
        assert_eq!(Severity::rank_of("High"), 1);
        assert_eq!(Severity::rank_of("MEDIUM"), 2);
        assert_eq!(Severity::rank_of("low"), 3);
        assert_eq!(Severity::rank_of("catastrophic"), 3);
        assert_eq!(Severity::rank_of(""), 3);
    }

    #[test]
    fn more_severe_comparison() {
        assert!(Severity::Severe.is_more_severe_than(Severity::High));
        assert!(!Severity::Low.is_more_severe_than(Severity::Low));
        assert_eq!(Severity::ALL.iter().min(), Some(&Severity::Severe));
    }
}
