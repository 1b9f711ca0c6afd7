//! Search API configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_TIMEOUT_SECS: u64 = 60;

/// Search API configuration
///
/// Indexing is disabled when `base_url` is not set.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Search API root URL
    pub base_url: Option<String>,

    /// Bearer token for the search API
    pub auth_token: Option<SecretString>,

    /// Index that holds service documents
    #[serde(default = "default_index")]
    pub index: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl SearchConfig {
    pub fn is_enabled(&self) -> bool {
        self.base_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate search configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = self.base_url.as_deref().filter(|u| !u.is_empty()) {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidSearchUrl);
            }
            if self.index.trim().is_empty() {
                return Err(ValidationError::MissingSearchIndex);
            }
        }
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ValidationError::InvalidTimeout {
                setting: "MARKETPLACE_API__SEARCH__TIMEOUT_SECS",
                max: MAX_TIMEOUT_SECS,
            });
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            auth_token: None,
            index: default_index(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_index() -> String {
    "g-cloud".to_string()
}

fn default_timeout() -> u64 {
    10
}
