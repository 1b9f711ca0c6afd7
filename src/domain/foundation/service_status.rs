//! Status enums for live services and their drafts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Visibility of a live service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Disabled,
    Enabled,
    Published,
}

impl ServiceStatus {
    /// Ordered the way error messages list them.
    pub const ALL: [ServiceStatus; 3] = [
        ServiceStatus::Disabled,
        ServiceStatus::Enabled,
        ServiceStatus::Published,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Disabled => "disabled",
            ServiceStatus::Enabled => "enabled",
            ServiceStatus::Published => "published",
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, ServiceStatus::Published)
    }

    /// Comma separated list used in "valid statuses" messages.
    pub fn valid_values() -> String {
        ServiceStatus::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_value("status", s))
    }
}

/// Workflow status of a draft service.
///
/// Fresh drafts start as `not-submitted` and move to `submitted` once they
/// pass full validation. Drafts copied from a live service carry that
/// service's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DraftStatus {
    NotSubmitted,
    Submitted,
    Failed,
    Published,
    Enabled,
    Disabled,
}

impl DraftStatus {
    pub const ALL: [DraftStatus; 6] = [
        DraftStatus::NotSubmitted,
        DraftStatus::Submitted,
        DraftStatus::Failed,
        DraftStatus::Published,
        DraftStatus::Enabled,
        DraftStatus::Disabled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStatus::NotSubmitted => "not-submitted",
            DraftStatus::Submitted => "submitted",
            DraftStatus::Failed => "failed",
            DraftStatus::Published => "published",
            DraftStatus::Enabled => "enabled",
            DraftStatus::Disabled => "disabled",
        }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, DraftStatus::Submitted)
    }
}

impl From<ServiceStatus> for DraftStatus {
    fn from(status: ServiceStatus) -> Self {
        match status {
            ServiceStatus::Disabled => DraftStatus::Disabled,
            ServiceStatus::Enabled => DraftStatus::Enabled,
            ServiceStatus::Published => DraftStatus::Published,
        }
    }
}

impl fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DraftStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_value("status", s))
    }
}
