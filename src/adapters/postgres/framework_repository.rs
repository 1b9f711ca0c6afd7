//! PostgreSQL implementation of FrameworkRepository.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use crate::domain::foundation::{DomainError, ErrorCode, FrameworkId, FrameworkStatus, LotId};
use crate::domain::framework::{Framework, Lot, NewFramework};
use crate::ports::FrameworkRepository;

use super::store::{map_sqlx_error, parse_column, violated_constraint, PostgresTransaction};

const FRAMEWORK_COLUMNS: &str = r#"
    id, slug, name, framework, status, clarification_questions_open, framework_agreement_details
"#;

/// Database row representation of a framework.
#[derive(Debug, sqlx::FromRow)]
struct FrameworkRow {
    id: i64,
    slug: String,
    name: String,
    framework: String,
    status: String,
    clarification_questions_open: bool,
    framework_agreement_details: Option<Value>,
}

impl FrameworkRow {
    fn into_framework(self, lots: Vec<Lot>) -> Result<Framework, DomainError> {
        Ok(Framework {
            id: FrameworkId::new(self.id),
            slug: self.slug,
            name: self.name,
            framework: self.framework,
            status: parse_column::<FrameworkStatus>("frameworks.status", &self.status)?,
            clarification_questions_open: self.clarification_questions_open,
            framework_agreement_details: self.framework_agreement_details,
            lots,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LotRow {
    id: i64,
    slug: String,
    name: String,
    one_service_limit: bool,
}

impl From<LotRow> for Lot {
    fn from(row: LotRow) -> Self {
        Lot {
            id: LotId::new(row.id),
            slug: row.slug,
            name: row.name,
            one_service_limit: row.one_service_limit,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FrameworkLotRow {
    framework_id: i64,
    id: i64,
    slug: String,
    name: String,
    one_service_limit: bool,
}

impl PostgresTransaction {
    async fn lots_by_framework(&mut self) -> Result<HashMap<i64, Vec<Lot>>, DomainError> {
        let rows: Vec<FrameworkLotRow> = sqlx::query_as(
            r#"
            SELECT fl.framework_id, l.id, l.slug, l.name, l.one_service_limit
            FROM framework_lots fl
            JOIN lots l ON l.id = fl.lot_id
            ORDER BY l.id
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to load framework lots", e))?;

        let mut lots: HashMap<i64, Vec<Lot>> = HashMap::new();
        for row in rows {
            lots.entry(row.framework_id).or_default().push(Lot {
                id: LotId::new(row.id),
                slug: row.slug,
                name: row.name,
                one_service_limit: row.one_service_limit,
            });
        }
        Ok(lots)
    }
}

#[async_trait]
impl FrameworkRepository for PostgresTransaction {
    async fn list_frameworks(&mut self) -> Result<Vec<Framework>, DomainError> {
        let rows: Vec<FrameworkRow> = sqlx::query_as(&format!(
            "SELECT {} FROM frameworks ORDER BY id",
            FRAMEWORK_COLUMNS
        ))
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to list frameworks", e))?;

        let mut lots = self.lots_by_framework().await?;
        rows.into_iter()
            .map(|row| {
                let framework_lots = lots.remove(&row.id).unwrap_or_default();
                row.into_framework(framework_lots)
            })
            .collect()
    }

    async fn find_framework(&mut self, slug: &str) -> Result<Option<Framework>, DomainError> {
        let row: Option<FrameworkRow> = sqlx::query_as(&format!(
            "SELECT {} FROM frameworks WHERE slug = $1",
            FRAMEWORK_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to fetch framework", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let lots: Vec<LotRow> = sqlx::query_as(
            r#"
            SELECT l.id, l.slug, l.name, l.one_service_limit
            FROM framework_lots fl
            JOIN lots l ON l.id = fl.lot_id
            WHERE fl.framework_id = $1
            ORDER BY l.id
            "#,
        )
        .bind(row.id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to fetch framework lots", e))?;

        row.into_framework(lots.into_iter().map(Lot::from).collect())
            .map(Some)
    }

    async fn find_lots(&mut self, slugs: &[String]) -> Result<Vec<Lot>, DomainError> {
        let rows: Vec<LotRow> = sqlx::query_as(
            "SELECT id, slug, name, one_service_limit FROM lots WHERE slug = ANY($1) ORDER BY id",
        )
        .bind(slugs)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to fetch lots", e))?;

        Ok(rows.into_iter().map(Lot::from).collect())
    }

    async fn insert_framework(&mut self, framework: &NewFramework) -> Result<Framework, DomainError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO frameworks (slug, name, framework, status, clarification_questions_open)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&framework.slug)
        .bind(&framework.name)
        .bind(&framework.framework)
        .bind(framework.status.as_str())
        .bind(framework.clarification_questions_open)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            if violated_constraint(&e).as_deref() == Some("frameworks_slug_key") {
                return DomainError::new(
                    ErrorCode::AlreadyExists,
                    format!("Slug '{}' already in use", framework.slug),
                );
            }
            map_sqlx_error("Failed to insert framework", e)
        })?;

        for lot in &framework.lots {
            sqlx::query("INSERT INTO framework_lots (framework_id, lot_id) VALUES ($1, $2)")
                .bind(id)
                .bind(lot.id.value())
                .execute(&mut *self.tx)
                .await
                .map_err(|e| map_sqlx_error("Failed to attach lot", e))?;
        }

        Ok(Framework {
            id: FrameworkId::new(id),
            slug: framework.slug.clone(),
            name: framework.name.clone(),
            framework: framework.framework.clone(),
            status: framework.status,
            clarification_questions_open: framework.clarification_questions_open,
            framework_agreement_details: None,
            lots: framework.lots.clone(),
        })
    }

    async fn update_framework(&mut self, framework: &Framework) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE frameworks SET
                status = $2,
                clarification_questions_open = $3,
                framework_agreement_details = $4
            WHERE id = $1
            "#,
        )
        .bind(framework.id.value())
        .bind(framework.status.as_str())
        .bind(framework.clarification_questions_open)
        .bind(&framework.framework_agreement_details)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to update framework", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::FrameworkNotFound,
                format!("framework '{}' not found", framework.slug),
            ));
        }
        Ok(())
    }
}
