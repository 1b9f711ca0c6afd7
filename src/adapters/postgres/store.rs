//! PostgreSQL implementation of the `Store` port.
//!
//! A `PostgresTransaction` wraps one `sqlx::Transaction` and implements every
//! repository port against it, so handlers can combine reads, writes and the
//! audit append in one unit of work.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Postgres};
use std::str::FromStr;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::ports::{IsolationLevel, Store, StoreTransaction};

/// SQLSTATE raised when a serializable transaction cannot be committed.
const SERIALIZATION_FAILURE: &str = "40001";

/// PostgreSQL-backed store.
///
/// Uses sqlx for database operations with connection pooling.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgresStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn begin(
        &self,
        isolation: IsolationLevel,
    ) -> Result<Box<dyn StoreTransaction>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to start transaction", e))?;

        if isolation == IsolationLevel::Serializable {
            sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::database("Failed to set isolation level", e))?;
        }

        Ok(Box::new(PostgresTransaction { tx }))
    }
}

/// An open PostgreSQL transaction. Rolls back when dropped uncommitted.
pub struct PostgresTransaction {
    pub(super) tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PostgresTransaction {
    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit transaction", e))
    }
}

/// Maps a driver error, surfacing serialization failures as their own code.
pub(super) fn map_sqlx_error(context: &str, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(SERIALIZATION_FAILURE) {
            return DomainError::new(
                ErrorCode::SerializationFailure,
                "Concurrent update detected, please retry",
            );
        }
    }
    DomainError::database(context, err)
}

/// Name of the violated constraint, if the error is a constraint violation.
pub(super) fn violated_constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint().map(str::to_string),
        _ => None,
    }
}

/// Parses a text column into a domain enum.
pub(super) fn parse_column<T>(column: &str, value: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = ValidationError>,
{
    value.parse::<T>().map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid {} value in database: {}", column, e),
        )
    })
}

/// Unwraps a JSONB column that must hold an object.
pub(super) fn json_object(
    column: &str,
    value: Value,
) -> Result<serde_json::Map<String, Value>, DomainError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(serde_json::Map::new()),
        other => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Expected a JSON object in {}, found {}", column, other),
        )),
    }
}
