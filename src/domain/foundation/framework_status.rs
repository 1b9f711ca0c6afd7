//! FrameworkStatus enum for the lifecycle of a procurement round.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Lifecycle status of a framework.
///
/// `coming -> open -> pending -> standstill -> live -> expired`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkStatus {
    Coming,
    Open,
    Pending,
    Standstill,
    Live,
    Expired,
}

impl FrameworkStatus {
    pub const ALL: [FrameworkStatus; 6] = [
        FrameworkStatus::Coming,
        FrameworkStatus::Open,
        FrameworkStatus::Pending,
        FrameworkStatus::Standstill,
        FrameworkStatus::Live,
        FrameworkStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameworkStatus::Coming => "coming",
            FrameworkStatus::Open => "open",
            FrameworkStatus::Pending => "pending",
            FrameworkStatus::Standstill => "standstill",
            FrameworkStatus::Live => "live",
            FrameworkStatus::Expired => "expired",
        }
    }

    /// Suppliers may only create drafts while the framework is open.
    pub fn accepts_submissions(&self) -> bool {
        matches!(self, FrameworkStatus::Open)
    }

    /// Services on live frameworks are visible to buyers and indexed for search.
    pub fn is_live(&self) -> bool {
        matches!(self, FrameworkStatus::Live)
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, FrameworkStatus::Expired)
    }
}

impl fmt::Display for FrameworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameworkStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FrameworkStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_value("framework status", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_status() {
        for status in FrameworkStatus::ALL {
            assert_eq!(status.as_str().parse::<FrameworkStatus>().unwrap(), status);
        }
    }

    #[test]
    fn rejects_unknown_status() {
        assert!("closed".parse::<FrameworkStatus>().is_err());
    }

    #[test]
    fn only_open_accepts_submissions() {
        assert!(FrameworkStatus::Open.accepts_submissions());
        assert!(!FrameworkStatus::Live.accepts_submissions());
        assert!(!FrameworkStatus::Pending.accepts_submissions());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&FrameworkStatus::Standstill).unwrap();
        assert_eq!(json, "\"standstill\"");
    }
}
