//! PostgreSQL pool settings
//!
//! Draft edits run in serializable transactions, so a pool that is too large
//! mostly buys more serialization failures. The defaults favour a small pool
//! that fails fast when the database is saturated.

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use super::error::ValidationError;

const MAX_POOL_SIZE: u32 = 100;
const MAX_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` or `postgresql://` connection URL
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a request waits for a free connection before failing
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Server-side cap on a single statement. 0 leaves the server default.
    #[serde(default = "default_statement_timeout")]
    pub statement_timeout_secs: u64,

    /// Reported in `pg_stat_activity`
    #[serde(default = "default_application_name")]
    pub application_name: String,

    /// Apply `migrations/` before serving
    #[serde(default)]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    /// Connection options for every pooled connection.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ValidationError> {
        let options = PgConnectOptions::from_str(&self.url)
            .map_err(|e| ValidationError::InvalidDatabaseUrl(e.to_string()))?
            .application_name(&self.application_name);
        Ok(match self.statement_timeout_secs {
            0 => options,
            secs => options.options([("statement_timeout", format!("{}s", secs))]),
        })
    }

    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingDatabaseUrl);
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl(
                "scheme must be postgres or postgresql".to_string(),
            ));
        }
        self.connect_options()?;
        if self.max_connections == 0 || self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::InvalidPoolSize { max: MAX_POOL_SIZE });
        }
        if self.acquire_timeout_secs == 0 || self.acquire_timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ValidationError::InvalidTimeout {
                setting: "MARKETPLACE_API__DATABASE__ACQUIRE_TIMEOUT_SECS",
                max: MAX_TIMEOUT_SECS,
            });
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            statement_timeout_secs: default_statement_timeout(),
            application_name: default_application_name(),
            run_migrations: false,
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_statement_timeout() -> u64 {
    30
}

fn default_application_name() -> String {
    "marketplace-api".to_string()
}
