//! PostgreSQL implementation of SupplierRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::agreement::FrameworkAgreement;
use crate::domain::foundation::{DomainError, ErrorCode, FrameworkId, SupplierId, Timestamp, UserId};
use crate::domain::supplier::{Supplier, SupplierFramework, User, SUPPLIER_ROLE};
use crate::ports::SupplierRepository;

use super::agreement_repository::AgreementRow;
use super::store::{map_sqlx_error, violated_constraint, PostgresTransaction};

#[derive(Debug, sqlx::FromRow)]
struct SupplierRow {
    supplier_id: i64,
    name: String,
    description: Option<String>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            supplier_id: SupplierId::new(row.supplier_id),
            name: row.name,
            description: row.description,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    email_address: String,
    name: String,
    role: String,
    supplier_id: Option<i64>,
    active: bool,
    logged_in_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            email_address: row.email_address,
            name: row.name,
            role: row.role,
            supplier_id: row.supplier_id.map(SupplierId::new),
            active: row.active,
            logged_in_at: row.logged_in_at.map(Timestamp::from_datetime),
        }
    }
}

/// Supplier framework joined with its current agreement, if any.
#[derive(Debug, sqlx::FromRow)]
struct SupplierFrameworkRow {
    supplier_id: i64,
    supplier_name: String,
    framework_id: i64,
    framework_slug: String,
    declaration: Option<Value>,
    on_framework: Option<bool>,
    agreement_id: Option<i64>,
    signed_agreement_details: Option<Value>,
    signed_agreement_path: Option<String>,
    signed_agreement_returned_at: Option<DateTime<Utc>>,
    countersigned_agreement_details: Option<Value>,
    countersigned_agreement_path: Option<String>,
    countersigned_agreement_returned_at: Option<DateTime<Utc>>,
}

impl TryFrom<SupplierFrameworkRow> for SupplierFramework {
    type Error = DomainError;

    fn try_from(row: SupplierFrameworkRow) -> Result<Self, Self::Error> {
        let agreement = match row.agreement_id {
            Some(id) => Some(FrameworkAgreement::try_from(AgreementRow {
                id,
                supplier_id: row.supplier_id,
                framework_id: row.framework_id,
                framework_slug: row.framework_slug.clone(),
                signed_agreement_details: row.signed_agreement_details,
                signed_agreement_path: row.signed_agreement_path,
                signed_agreement_returned_at: row.signed_agreement_returned_at,
                countersigned_agreement_details: row.countersigned_agreement_details,
                countersigned_agreement_path: row.countersigned_agreement_path,
                countersigned_agreement_returned_at: row.countersigned_agreement_returned_at,
            })?),
            None => None,
        };

        Ok(SupplierFramework {
            supplier_id: SupplierId::new(row.supplier_id),
            supplier_name: row.supplier_name,
            framework_id: FrameworkId::new(row.framework_id),
            framework_slug: row.framework_slug,
            declaration: row.declaration,
            on_framework: row.on_framework,
            agreement,
        })
    }
}

const SUPPLIER_FRAMEWORK_SELECT: &str = r#"
    SELECT sf.supplier_id, s.name AS supplier_name, sf.framework_id,
           f.slug AS framework_slug, sf.declaration, sf.on_framework,
           fa.id AS agreement_id, fa.signed_agreement_details, fa.signed_agreement_path,
           fa.signed_agreement_returned_at, fa.countersigned_agreement_details,
           fa.countersigned_agreement_path, fa.countersigned_agreement_returned_at
    FROM supplier_frameworks sf
    JOIN suppliers s ON s.supplier_id = sf.supplier_id
    JOIN frameworks f ON f.id = sf.framework_id
    LEFT JOIN framework_agreements fa
        ON fa.supplier_id = sf.supplier_id AND fa.framework_id = sf.framework_id
"#;

const USER_COLUMNS: &str = "id, email_address, name, role, supplier_id, active, logged_in_at";

#[async_trait]
impl SupplierRepository for PostgresTransaction {
    async fn find_supplier(&mut self, id: SupplierId) -> Result<Option<Supplier>, DomainError> {
        let row: Option<SupplierRow> = sqlx::query_as(
            "SELECT supplier_id, name, description FROM suppliers WHERE supplier_id = $1",
        )
        .bind(id.value())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to fetch supplier", e))?;

        Ok(row.map(Supplier::from))
    }

    async fn insert_supplier(&mut self, supplier: &Supplier) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO suppliers (supplier_id, name, description) VALUES ($1, $2, $3)")
            .bind(supplier.supplier_id.value())
            .bind(&supplier.name)
            .bind(&supplier.description)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                if violated_constraint(&e).as_deref() == Some("suppliers_pkey") {
                    return DomainError::new(
                        ErrorCode::AlreadyExists,
                        format!("Supplier ID '{}' already exists", supplier.supplier_id),
                    );
                }
                map_sqlx_error("Failed to insert supplier", e)
            })?;
        Ok(())
    }

    async fn find_supplier_framework(
        &mut self,
        supplier_id: SupplierId,
        framework_id: FrameworkId,
    ) -> Result<Option<SupplierFramework>, DomainError> {
        let row: Option<SupplierFrameworkRow> = sqlx::query_as(&format!(
            "{} WHERE sf.supplier_id = $1 AND sf.framework_id = $2",
            SUPPLIER_FRAMEWORK_SELECT
        ))
        .bind(supplier_id.value())
        .bind(framework_id.value())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to fetch supplier framework", e))?;

        row.map(SupplierFramework::try_from).transpose()
    }

    async fn insert_supplier_framework(
        &mut self,
        supplier_framework: &SupplierFramework,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO supplier_frameworks (supplier_id, framework_id, declaration, on_framework)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(supplier_framework.supplier_id.value())
        .bind(supplier_framework.framework_id.value())
        .bind(&supplier_framework.declaration)
        .bind(supplier_framework.on_framework)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            if violated_constraint(&e).as_deref() == Some("supplier_frameworks_pkey") {
                return DomainError::new(
                    ErrorCode::AlreadyExists,
                    format!(
                        "supplier {} is already registered on framework '{}'",
                        supplier_framework.supplier_id, supplier_framework.framework_slug
                    ),
                );
            }
            map_sqlx_error("Failed to insert supplier framework", e)
        })?;
        Ok(())
    }

    async fn update_supplier_framework(
        &mut self,
        supplier_framework: &SupplierFramework,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE supplier_frameworks SET declaration = $3, on_framework = $4
            WHERE supplier_id = $1 AND framework_id = $2
            "#,
        )
        .bind(supplier_framework.supplier_id.value())
        .bind(supplier_framework.framework_id.value())
        .bind(&supplier_framework.declaration)
        .bind(supplier_framework.on_framework)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to update supplier framework", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SupplierNotFound,
                format!(
                    "supplier {} has not registered interest in '{}'",
                    supplier_framework.supplier_id, supplier_framework.framework_slug
                ),
            ));
        }
        Ok(())
    }

    async fn list_supplier_frameworks(
        &mut self,
        framework_id: FrameworkId,
    ) -> Result<Vec<SupplierFramework>, DomainError> {
        let rows: Vec<SupplierFrameworkRow> = sqlx::query_as(&format!(
            "{} WHERE sf.framework_id = $1 ORDER BY sf.supplier_id",
            SUPPLIER_FRAMEWORK_SELECT
        ))
        .bind(framework_id.value())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to list supplier frameworks", e))?;

        rows.into_iter().map(SupplierFramework::try_from).collect()
    }

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id.value())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to fetch user", e))?;

        Ok(row.map(User::from))
    }

    async fn list_supplier_users(&mut self) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE role = $1 ORDER BY id",
            USER_COLUMNS
        ))
        .bind(SUPPLIER_ROLE)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to list supplier users", e))?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
