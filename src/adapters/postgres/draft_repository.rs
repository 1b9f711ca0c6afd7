//! PostgreSQL implementation of DraftServiceRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::foundation::{
    DomainError, DraftId, DraftStatus, ErrorCode, FrameworkId, FrameworkStatus, LotId, ServiceId,
    SupplierId, Timestamp,
};
use crate::domain::framework::{DraftSummary, FrameworkSummary, Lot};
use crate::domain::service::{DraftService, NewDraftService};
use crate::ports::{DraftQuery, DraftServiceRepository};

use super::store::{json_object, map_sqlx_error, parse_column, violated_constraint, PostgresTransaction};

/// Database row representation of a draft service.
#[derive(Debug, sqlx::FromRow)]
struct DraftRow {
    id: i64,
    service_id: Option<String>,
    supplier_id: i64,
    supplier_name: String,
    framework_id: i64,
    framework_slug: String,
    framework_name: String,
    framework_framework: String,
    framework_status: String,
    lot_id: i64,
    lot_slug: String,
    lot_name: String,
    lot_one_service_limit: bool,
    status: String,
    data: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DraftRow> for DraftService {
    type Error = DomainError;

    fn try_from(row: DraftRow) -> Result<Self, Self::Error> {
        let service_id = row
            .service_id
            .map(ServiceId::new)
            .transpose()
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid service_id: {}", e))
            })?;

        Ok(DraftService {
            id: DraftId::new(row.id),
            service_id,
            supplier_id: SupplierId::new(row.supplier_id),
            supplier_name: row.supplier_name,
            framework: FrameworkSummary {
                id: FrameworkId::new(row.framework_id),
                slug: row.framework_slug,
                name: row.framework_name,
                framework: row.framework_framework,
                status: parse_column::<FrameworkStatus>("frameworks.status", &row.framework_status)?,
            },
            lot: Lot {
                id: LotId::new(row.lot_id),
                slug: row.lot_slug,
                name: row.lot_name,
                one_service_limit: row.lot_one_service_limit,
            },
            status: parse_column::<DraftStatus>("draft_services.status", &row.status)?,
            data: json_object("draft_services.data", row.data)?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DraftSummaryRow {
    supplier_id: i64,
    status: String,
    lot_slug: String,
}

const DRAFT_SELECT: &str = r#"
    SELECT d.id, d.service_id, d.supplier_id, sup.name AS supplier_name,
           f.id AS framework_id, f.slug AS framework_slug, f.name AS framework_name,
           f.framework AS framework_framework, f.status AS framework_status,
           l.id AS lot_id, l.slug AS lot_slug, l.name AS lot_name,
           l.one_service_limit AS lot_one_service_limit,
           d.status, d.data, d.created_at, d.updated_at
    FROM draft_services d
    JOIN suppliers sup ON sup.supplier_id = d.supplier_id
    JOIN frameworks f ON f.id = d.framework_id
    JOIN lots l ON l.id = d.lot_id
"#;

/// Maps a foreign key violation on insert to the missing reference.
fn missing_reference(constraint: &str, draft: &NewDraftService) -> DomainError {
    if constraint.contains("supplier") {
        DomainError::new(
            ErrorCode::SupplierNotFound,
            format!("supplier {} not found", draft.supplier_id),
        )
    } else if constraint.contains("lot") {
        DomainError::new(ErrorCode::LotNotFound, format!("lot {} not found", draft.lot_id))
    } else {
        DomainError::new(
            ErrorCode::FrameworkNotFound,
            format!("framework {} not found", draft.framework_id),
        )
    }
}

#[async_trait]
impl DraftServiceRepository for PostgresTransaction {
    async fn find_draft(&mut self, id: DraftId) -> Result<Option<DraftService>, DomainError> {
        let row: Option<DraftRow> = sqlx::query_as(&format!("{} WHERE d.id = $1", DRAFT_SELECT))
            .bind(id.value())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to fetch draft", e))?;

        row.map(DraftService::try_from).transpose()
    }

    async fn list_drafts(&mut self, query: &DraftQuery) -> Result<Vec<DraftService>, DomainError> {
        let sql = format!(
            r#"{}
            WHERE d.supplier_id = $1
              AND ($2::bigint IS NULL OR d.framework_id = $2)
              AND ($3::text IS NULL OR d.service_id = $3)
            ORDER BY d.id
            "#,
            DRAFT_SELECT
        );
        let rows: Vec<DraftRow> = sqlx::query_as(&sql)
            .bind(query.supplier_id.value())
            .bind(query.framework_id.map(|id| id.value()))
            .bind(query.service_id.as_ref().map(|id| id.as_str().to_string()))
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to list drafts", e))?;

        rows.into_iter().map(DraftService::try_from).collect()
    }

    async fn draft_exists_for_service(&mut self, service_id: &ServiceId) -> Result<bool, DomainError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM draft_services WHERE service_id = $1)")
                .bind(service_id.as_str())
                .fetch_one(&mut *self.tx)
                .await
                .map_err(|e| map_sqlx_error("Failed to check drafts", e))?;
        Ok(exists)
    }

    async fn draft_exists_for_lot(
        &mut self,
        supplier_id: SupplierId,
        framework_id: FrameworkId,
        lot_id: LotId,
    ) -> Result<bool, DomainError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM draft_services
                WHERE supplier_id = $1 AND framework_id = $2 AND lot_id = $3
            )
            "#,
        )
        .bind(supplier_id.value())
        .bind(framework_id.value())
        .bind(lot_id.value())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to check drafts", e))?;
        Ok(exists)
    }

    async fn insert_draft(&mut self, draft: &NewDraftService) -> Result<DraftService, DomainError> {
        let now = Timestamp::now();
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO draft_services (
                service_id, supplier_id, framework_id, lot_id, status, data, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id
            "#,
        )
        .bind(draft.service_id.as_ref().map(|id| id.as_str().to_string()))
        .bind(draft.supplier_id.value())
        .bind(draft.framework_id.value())
        .bind(draft.lot_id.value())
        .bind(draft.status.as_str())
        .bind(Value::Object(draft.data.clone()))
        .bind(now.as_datetime())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some(constraint) => missing_reference(&constraint, draft),
            None => map_sqlx_error("Failed to insert draft", e),
        })?;

        self.find_draft(DraftId::new(id)).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::DraftNotFound, format!("draft {} not found", id))
        })
    }

    async fn update_draft(&mut self, draft: &DraftService) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE draft_services SET status = $2, data = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(draft.id.value())
        .bind(draft.status.as_str())
        .bind(Value::Object(draft.data.clone()))
        .bind(draft.updated_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to update draft", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DraftNotFound,
                format!("draft {} not found", draft.id),
            ));
        }
        Ok(())
    }

    async fn delete_draft(&mut self, id: DraftId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM draft_services WHERE id = $1")
            .bind(id.value())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete draft", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DraftNotFound,
                format!("draft {} not found", id),
            ));
        }
        Ok(())
    }

    async fn list_draft_summaries(
        &mut self,
        framework_id: FrameworkId,
    ) -> Result<Vec<DraftSummary>, DomainError> {
        let rows: Vec<DraftSummaryRow> = sqlx::query_as(
            r#"
            SELECT d.supplier_id, d.status, l.slug AS lot_slug
            FROM draft_services d
            JOIN lots l ON l.id = d.lot_id
            WHERE d.framework_id = $1
            "#,
        )
        .bind(framework_id.value())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to list draft summaries", e))?;

        rows.into_iter()
            .map(|row| {
                Ok(DraftSummary {
                    supplier_id: SupplierId::new(row.supplier_id),
                    status: parse_column::<DraftStatus>("draft_services.status", &row.status)?,
                    lot_slug: row.lot_slug,
                })
            })
            .collect()
    }
}
