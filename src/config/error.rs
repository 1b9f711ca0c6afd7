//! Startup configuration errors

use thiserror::Error;

/// Configuration could not be read or is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A setting that was read but cannot be used.
///
/// Messages name the environment variable so the operator knows what to fix.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("MARKETPLACE_API__DATABASE__URL must be set")]
    MissingDatabaseUrl,

    #[error("MARKETPLACE_API__DATABASE__URL is not a PostgreSQL URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("MARKETPLACE_API__DATABASE__MAX_CONNECTIONS must be between 1 and {max}")]
    InvalidPoolSize { max: u32 },

    #[error("MARKETPLACE_API__SERVER__HOST '{0}' is not an IP address")]
    InvalidHost(String),

    #[error("MARKETPLACE_API__SERVER__PORT must not be 0")]
    InvalidPort,

    #[error("{setting} must be between 1 and {max} seconds")]
    InvalidTimeout { setting: &'static str, max: u64 },

    #[error("MARKETPLACE_API__SEARCH__BASE_URL must use http or https")]
    InvalidSearchUrl,

    #[error("MARKETPLACE_API__SEARCH__INDEX must not be empty")]
    MissingSearchIndex,

    #[error("MARKETPLACE_API__API__PAGE_SIZE must be between 1 and 1000")]
    InvalidPageSize,
}
