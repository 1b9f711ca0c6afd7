//! Supplier repository port.
//!
//! Covers suppliers, their framework registrations and the read-only user
//! table. Supplier frameworks are returned with their current agreement.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, FrameworkId, SupplierId, UserId};
use crate::domain::supplier::{Supplier, SupplierFramework, User};

#[async_trait]
pub trait SupplierRepository: Send {
    async fn find_supplier(&mut self, id: SupplierId) -> Result<Option<Supplier>, DomainError>;

    /// # Errors
    ///
    /// - `AlreadyExists` if the supplier id is taken
    async fn insert_supplier(&mut self, supplier: &Supplier) -> Result<(), DomainError>;

    async fn find_supplier_framework(
        &mut self,
        supplier_id: SupplierId,
        framework_id: FrameworkId,
    ) -> Result<Option<SupplierFramework>, DomainError>;

    /// # Errors
    ///
    /// - `AlreadyExists` if the supplier is already registered
    async fn insert_supplier_framework(
        &mut self,
        supplier_framework: &SupplierFramework,
    ) -> Result<(), DomainError>;

    /// Writes the declaration and on-framework flag. The agreement is not touched.
    async fn update_supplier_framework(
        &mut self,
        supplier_framework: &SupplierFramework,
    ) -> Result<(), DomainError>;

    /// Every registration on a framework, ordered by supplier id.
    async fn list_supplier_frameworks(
        &mut self,
        framework_id: FrameworkId,
    ) -> Result<Vec<SupplierFramework>, DomainError>;

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Every user with the supplier role.
    async fn list_supplier_users(&mut self) -> Result<Vec<User>, DomainError>;
}
