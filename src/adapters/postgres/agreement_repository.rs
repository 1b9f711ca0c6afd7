//! PostgreSQL implementation of AgreementRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::agreement::{FrameworkAgreement, NewFrameworkAgreement};
use crate::domain::foundation::{
    AgreementId, DomainError, ErrorCode, FrameworkId, SupplierId, Timestamp,
};
use crate::ports::AgreementRepository;

use super::store::{json_object, map_sqlx_error, violated_constraint, PostgresTransaction};

/// Database row representation of a framework agreement.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct AgreementRow {
    pub id: i64,
    pub supplier_id: i64,
    pub framework_id: i64,
    pub framework_slug: String,
    pub signed_agreement_details: Option<Value>,
    pub signed_agreement_path: Option<String>,
    pub signed_agreement_returned_at: Option<DateTime<Utc>>,
    pub countersigned_agreement_details: Option<Value>,
    pub countersigned_agreement_path: Option<String>,
    pub countersigned_agreement_returned_at: Option<DateTime<Utc>>,
}

impl TryFrom<AgreementRow> for FrameworkAgreement {
    type Error = DomainError;

    fn try_from(row: AgreementRow) -> Result<Self, Self::Error> {
        Ok(FrameworkAgreement {
            id: AgreementId::new(row.id),
            supplier_id: SupplierId::new(row.supplier_id),
            framework_id: FrameworkId::new(row.framework_id),
            framework_slug: row.framework_slug,
            signed_agreement_details: row
                .signed_agreement_details
                .map(|v| json_object("signed_agreement_details", v))
                .transpose()?,
            signed_agreement_path: row.signed_agreement_path,
            signed_agreement_returned_at: row.signed_agreement_returned_at.map(Timestamp::from_datetime),
            countersigned_agreement_details: row
                .countersigned_agreement_details
                .map(|v| json_object("countersigned_agreement_details", v))
                .transpose()?,
            countersigned_agreement_path: row.countersigned_agreement_path,
            countersigned_agreement_returned_at: row
                .countersigned_agreement_returned_at
                .map(Timestamp::from_datetime),
        })
    }
}

#[async_trait]
impl AgreementRepository for PostgresTransaction {
    async fn find_agreement(
        &mut self,
        id: AgreementId,
    ) -> Result<Option<FrameworkAgreement>, DomainError> {
        let row: Option<AgreementRow> = sqlx::query_as(
            r#"
            SELECT fa.id, fa.supplier_id, fa.framework_id, f.slug AS framework_slug,
                   fa.signed_agreement_details, fa.signed_agreement_path,
                   fa.signed_agreement_returned_at, fa.countersigned_agreement_details,
                   fa.countersigned_agreement_path, fa.countersigned_agreement_returned_at
            FROM framework_agreements fa
            JOIN frameworks f ON f.id = fa.framework_id
            WHERE fa.id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to fetch agreement", e))?;

        row.map(FrameworkAgreement::try_from).transpose()
    }

    async fn insert_agreement(
        &mut self,
        agreement: &NewFrameworkAgreement,
    ) -> Result<FrameworkAgreement, DomainError> {
        let (id, framework_slug): (i64, String) = sqlx::query_as(
            r#"
            WITH inserted AS (
                INSERT INTO framework_agreements (supplier_id, framework_id)
                VALUES ($1, $2)
                RETURNING id, framework_id
            )
            SELECT inserted.id, f.slug
            FROM inserted
            JOIN frameworks f ON f.id = inserted.framework_id
            "#,
        )
        .bind(agreement.supplier_id.value())
        .bind(agreement.framework_id.value())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| match violated_constraint(&e).as_deref() {
            Some("framework_agreements_supplier_framework_key") => DomainError::new(
                ErrorCode::AlreadyExists,
                format!(
                    "supplier {} already has an agreement for framework {}",
                    agreement.supplier_id, agreement.framework_id
                ),
            ),
            Some(_) => DomainError::new(
                ErrorCode::SupplierNotFound,
                format!(
                    "supplier {} is not registered on framework {}",
                    agreement.supplier_id, agreement.framework_id
                ),
            ),
            None => map_sqlx_error("Failed to insert agreement", e),
        })?;

        Ok(FrameworkAgreement::new(
            AgreementId::new(id),
            agreement.supplier_id,
            agreement.framework_id,
            framework_slug,
        ))
    }

    async fn update_agreement(&mut self, agreement: &FrameworkAgreement) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE framework_agreements SET
                signed_agreement_details = $2,
                signed_agreement_path = $3,
                signed_agreement_returned_at = $4,
                countersigned_agreement_details = $5,
                countersigned_agreement_path = $6,
                countersigned_agreement_returned_at = $7
            WHERE id = $1
            "#,
        )
        .bind(agreement.id.value())
        .bind(agreement.signed_agreement_details.clone().map(Value::Object))
        .bind(&agreement.signed_agreement_path)
        .bind(agreement.signed_agreement_returned_at.map(|t| *t.as_datetime()))
        .bind(agreement.countersigned_agreement_details.clone().map(Value::Object))
        .bind(&agreement.countersigned_agreement_path)
        .bind(agreement.countersigned_agreement_returned_at.map(|t| *t.as_datetime()))
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to update agreement", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::AgreementNotFound,
                format!("agreement {} not found", agreement.id),
            ));
        }
        Ok(())
    }
}
