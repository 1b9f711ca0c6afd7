//! PostgreSQL implementation of ServiceRepository.
//!
//! Live and archived services share a row shape; both are joined with their
//! supplier, framework and lot so the domain entity is complete.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{Postgres, QueryBuilder};

use crate::domain::foundation::{
    ArchivedServiceId, DomainError, ErrorCode, FrameworkId, FrameworkStatus, LotId, ServiceId,
    ServiceStatus, SupplierId, Timestamp,
};
use crate::domain::framework::{FrameworkSummary, Lot};
use crate::domain::service::{ArchivedService, Service, ServiceFilter, ServiceOrder};
use crate::ports::{Page, ServiceRepository};

use super::store::{json_object, map_sqlx_error, parse_column, violated_constraint, PostgresTransaction};

/// Database row representation of a live or archived service.
#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    service_id: String,
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

impl TryFrom<ServiceRow> for Service {
    type Error = DomainError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        Ok(Service {
            service_id: ServiceId::new(row.service_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid service_id: {}", e))
            })?,
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
            status: parse_column::<ServiceStatus>("services.status", &row.status)?,
            data: json_object("services.data", row.data)?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ArchivedServiceRow {
    archived_id: i64,
    #[sqlx(flatten)]
    service: ServiceRow,
}

impl TryFrom<ArchivedServiceRow> for ArchivedService {
    type Error = DomainError;

    fn try_from(row: ArchivedServiceRow) -> Result<Self, Self::Error> {
        Ok(ArchivedService {
            id: ArchivedServiceId::new(row.archived_id),
            service: Service::try_from(row.service)?,
        })
    }
}

/// SELECT over `table` (aliased `s`) joined with supplier, framework and lot.
fn service_select(table: &str, extra_columns: &str) -> String {
    format!(
        r#"
        SELECT {extra_columns}
               s.service_id, s.supplier_id, sup.name AS supplier_name,
               f.id AS framework_id, f.slug AS framework_slug, f.name AS framework_name,
               f.framework AS framework_framework, f.status AS framework_status,
               l.id AS lot_id, l.slug AS lot_slug, l.name AS lot_name,
               l.one_service_limit AS lot_one_service_limit,
               s.status, s.data, s.created_at, s.updated_at
        FROM {table} s
        JOIN suppliers sup ON sup.supplier_id = s.supplier_id
        JOIN frameworks f ON f.id = s.framework_id
        JOIN lots l ON l.id = s.lot_id
        "#
    )
}

/// Appends the `WHERE` clause shared by listing and counting.
fn push_service_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ServiceFilter) {
    qb.push(" WHERE TRUE");

    if let Some(supplier_id) = filter.supplier_id {
        qb.push(" AND s.supplier_id = ").push_bind(supplier_id.value());
    }
    match &filter.framework_slugs {
        Some(slugs) => {
            qb.push(" AND f.slug = ANY(").push_bind(slugs.clone()).push(")");
        }
        None => {
            qb.push(" AND f.status = ")
                .push_bind(FrameworkStatus::Live.as_str());
        }
    }
    if !filter.statuses.is_empty() {
        let statuses: Vec<String> = filter.statuses.iter().map(|s| s.as_str().to_string()).collect();
        qb.push(" AND s.status = ANY(").push_bind(statuses).push(")");
    }
    if let Some(lot) = &filter.lot {
        qb.push(" AND l.slug = ").push_bind(lot.clone());
    }
    if let Some(key) = filter.location_key() {
        match &filter.location {
            Some(location) => {
                qb.push(" AND (s.data -> ")
                    .push_bind(key)
                    .push(") @> jsonb_build_array(")
                    .push_bind(location.clone())
                    .push("::text)");
            }
            None => {
                qb.push(" AND (s.data -> ").push_bind(key).push(") IS NOT NULL");
            }
        }
    }
}

#[async_trait]
impl ServiceRepository for PostgresTransaction {
    async fn find_service(&mut self, id: &ServiceId) -> Result<Option<Service>, DomainError> {
        let sql = format!("{} WHERE s.service_id = $1", service_select("services", ""));
        let row: Option<ServiceRow> = sqlx::query_as(&sql)
            .bind(id.as_str())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to fetch service", e))?;

        row.map(Service::try_from).transpose()
    }

    async fn service_exists(&mut self, id: &ServiceId) -> Result<bool, DomainError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM services WHERE service_id = $1)")
                .bind(id.as_str())
                .fetch_one(&mut *self.tx)
                .await
                .map_err(|e| map_sqlx_error("Failed to check service", e))?;
        Ok(exists)
    }

    async fn insert_service(&mut self, service: &Service) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO services (
                service_id, supplier_id, framework_id, lot_id, status, data, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(service.service_id.as_str())
        .bind(service.supplier_id.value())
        .bind(service.framework.id.value())
        .bind(service.lot.id.value())
        .bind(service.status.as_str())
        .bind(Value::Object(service.data.clone()))
        .bind(service.created_at.as_datetime())
        .bind(service.updated_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            if violated_constraint(&e).as_deref() == Some("services_service_id_key") {
                return DomainError::new(
                    ErrorCode::AlreadyExists,
                    format!("service {} already exists", service.service_id),
                );
            }
            map_sqlx_error("Failed to insert service", e)
        })?;
        Ok(())
    }

    async fn update_service(&mut self, service: &Service) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE services SET status = $2, data = $3, updated_at = $4 WHERE service_id = $1",
        )
        .bind(service.service_id.as_str())
        .bind(service.status.as_str())
        .bind(Value::Object(service.data.clone()))
        .bind(service.updated_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to update service", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ServiceNotFound,
                format!("service {} not found", service.service_id),
            ));
        }
        Ok(())
    }

    async fn list_services(
        &mut self,
        filter: &ServiceFilter,
        page: Option<Page>,
    ) -> Result<Vec<Service>, DomainError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(service_select("services", ""));
        push_service_filter(&mut qb, filter);

        qb.push(match filter.order() {
            ServiceOrder::ById => " ORDER BY s.service_id",
            ServiceOrder::BySupplierListing => {
                " ORDER BY f.slug DESC, l.id, s.data ->> 'serviceName'"
            }
        });
        if let Some(page) = page {
            qb.push(" LIMIT ")
                .push_bind(page.limit as i64)
                .push(" OFFSET ")
                .push_bind(page.offset as i64);
        }

        let rows: Vec<ServiceRow> = qb
            .build_query_as()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to list services", e))?;

        rows.into_iter().map(Service::try_from).collect()
    }

    async fn count_services(&mut self, filter: &ServiceFilter) -> Result<u64, DomainError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT COUNT(*)
            FROM services s
            JOIN frameworks f ON f.id = s.framework_id
            JOIN lots l ON l.id = s.lot_id
            "#,
        );
        push_service_filter(&mut qb, filter);

        let (count,): (i64,) = qb
            .build_query_as()
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to count services", e))?;
        Ok(count as u64)
    }

    async fn archive_service(&mut self, service: &Service) -> Result<ArchivedServiceId, DomainError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO archived_services (
                service_id, supplier_id, framework_id, lot_id, status, data, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(service.service_id.as_str())
        .bind(service.supplier_id.value())
        .bind(service.framework.id.value())
        .bind(service.lot.id.value())
        .bind(service.status.as_str())
        .bind(Value::Object(service.data.clone()))
        .bind(service.created_at.as_datetime())
        .bind(service.updated_at.as_datetime())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to archive service", e))?;

        Ok(ArchivedServiceId::new(id))
    }

    async fn find_archived_service(
        &mut self,
        id: ArchivedServiceId,
    ) -> Result<Option<ArchivedService>, DomainError> {
        let sql = format!(
            "{} WHERE s.id = $1",
            service_select("archived_services", "s.id AS archived_id,")
        );
        let row: Option<ArchivedServiceRow> = sqlx::query_as(&sql)
            .bind(id.value())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to fetch archived service", e))?;

        row.map(ArchivedService::try_from).transpose()
    }

    async fn list_archived_services(
        &mut self,
        service_id: &ServiceId,
    ) -> Result<Vec<ArchivedService>, DomainError> {
        let sql = format!(
            "{} WHERE s.service_id = $1 ORDER BY s.id",
            service_select("archived_services", "s.id AS archived_id,")
        );
        let rows: Vec<ArchivedServiceRow> = sqlx::query_as(&sql)
            .bind(service_id.as_str())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to list archived services", e))?;

        rows.into_iter().map(ArchivedService::try_from).collect()
    }
}
