//! Framework agreement repository port.

use async_trait::async_trait;

use crate::domain::agreement::{FrameworkAgreement, NewFrameworkAgreement};
use crate::domain::foundation::{AgreementId, DomainError};

#[async_trait]
pub trait AgreementRepository: Send {
    /// Returns `None` if the agreement doesn't exist.
    async fn find_agreement(&mut self, id: AgreementId) -> Result<Option<FrameworkAgreement>, DomainError>;

    /// Creates a blank agreement as the supplier framework's current one.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if the supplier framework already has an agreement
    /// - `SupplierNotFound` if the supplier isn't registered on the framework
    async fn insert_agreement(
        &mut self,
        agreement: &NewFrameworkAgreement,
    ) -> Result<FrameworkAgreement, DomainError>;

    /// # Errors
    ///
    /// - `AgreementNotFound` if the agreement doesn't exist
    async fn update_agreement(&mut self, agreement: &FrameworkAgreement) -> Result<(), DomainError>;
}
