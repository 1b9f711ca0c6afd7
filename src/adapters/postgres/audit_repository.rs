//! PostgreSQL implementation of AuditEventRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{Postgres, QueryBuilder};

use crate::domain::audit::{AuditEvent, AuditObject, AuditObjectType, AuditQuery, AuditType, NewAuditEvent};
use crate::domain::foundation::{AuditEventId, DomainError, ErrorCode, Timestamp};
use crate::ports::AuditEventRepository;

use super::store::{map_sqlx_error, parse_column, PostgresTransaction};

/// Database row representation of an audit event.
#[derive(Debug, sqlx::FromRow)]
struct AuditEventRow {
    id: i64,
    audit_type: String,
    user: String,
    data: Value,
    object_type: Option<String>,
    object_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AuditEventRow> for AuditEvent {
    type Error = DomainError;

    fn try_from(row: AuditEventRow) -> Result<Self, Self::Error> {
        let object = match (row.object_type, row.object_id) {
            (Some(object_type), Some(object_id)) => {
                let object_type = AuditObjectType::parse(&object_type).ok_or_else(|| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Invalid audit object type in database: {}", object_type),
                    )
                })?;
                Some(AuditObject::new(object_type, object_id))
            }
            _ => None,
        };

        Ok(AuditEvent {
            id: AuditEventId::new(row.id),
            audit_type: parse_column::<AuditType>("audit_events.type", &row.audit_type)?,
            user: row.user,
            data: row.data,
            object,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

const AUDIT_COLUMNS: &str =
    r#"id, type AS audit_type, "user", data, object_type, object_id, created_at"#;

fn push_audit_filter(qb: &mut QueryBuilder<'_, Postgres>, query: &AuditQuery) {
    qb.push(" WHERE TRUE");
    if let Some(audit_type) = query.audit_type {
        qb.push(" AND type = ").push_bind(audit_type.as_str());
    }
    if let Some(date) = query.date {
        qb.push(" AND (created_at AT TIME ZONE 'UTC')::date = ").push_bind(date);
    }
    if let Some(object) = &query.object {
        qb.push(" AND object_type = ")
            .push_bind(object.object_type.as_str())
            .push(" AND object_id = ")
            .push_bind(object.object_id.clone());
    }
}

#[async_trait]
impl AuditEventRepository for PostgresTransaction {
    async fn append_audit_event(&mut self, event: &NewAuditEvent) -> Result<AuditEvent, DomainError> {
        let row: AuditEventRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO audit_events (type, "user", data, object_type, object_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            AUDIT_COLUMNS
        ))
        .bind(event.audit_type.as_str())
        .bind(&event.user)
        .bind(&event.data)
        .bind(event.object.as_ref().map(|o| o.object_type.as_str()))
        .bind(event.object.as_ref().map(|o| o.object_id.clone()))
        .bind(Timestamp::now().as_datetime())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to append audit event", e))?;

        AuditEvent::try_from(row)
    }

    async fn list_audit_events(&mut self, query: &AuditQuery) -> Result<Vec<AuditEvent>, DomainError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM audit_events", AUDIT_COLUMNS));
        push_audit_filter(&mut qb, query);
        qb.push(if query.latest_first { " ORDER BY id DESC" } else { " ORDER BY id" });
        qb.push(" LIMIT ")
            .push_bind(query.limit as i64)
            .push(" OFFSET ")
            .push_bind(query.offset as i64);

        let rows: Vec<AuditEventRow> = qb
            .build_query_as()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to list audit events", e))?;

        rows.into_iter().map(AuditEvent::try_from).collect()
    }

    async fn count_audit_events(&mut self, query: &AuditQuery) -> Result<u64, DomainError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM audit_events");
        push_audit_filter(&mut qb, query);

        let (count,): (i64,) = qb
            .build_query_as()
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to count audit events", e))?;
        Ok(count as u64)
    }
}
