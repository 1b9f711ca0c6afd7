//! Draft service repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, DraftId, FrameworkId, LotId, ServiceId, SupplierId};
use crate::domain::framework::DraftSummary;
use crate::domain::service::{DraftService, NewDraftService};

/// Criteria for listing a supplier's drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftQuery {
    pub supplier_id: SupplierId,
    pub framework_id: Option<FrameworkId>,
    pub service_id: Option<ServiceId>,
}

impl DraftQuery {
    pub fn matches(&self, draft: &DraftService) -> bool {
        draft.supplier_id == self.supplier_id
            && self.framework_id.map_or(true, |id| draft.framework.id == id)
            && self
                .service_id
                .as_ref()
                .map_or(true, |id| draft.service_id.as_ref() == Some(id))
    }
}

#[async_trait]
pub trait DraftServiceRepository: Send {
    async fn find_draft(&mut self, id: DraftId) -> Result<Option<DraftService>, DomainError>;

    /// Drafts matching the query, ordered by id.
    async fn list_drafts(&mut self, query: &DraftQuery) -> Result<Vec<DraftService>, DomainError>;

    /// True if a draft has already been copied from the live service.
    async fn draft_exists_for_service(&mut self, service_id: &ServiceId) -> Result<bool, DomainError>;

    /// True if the supplier has any draft on the lot of the framework.
    async fn draft_exists_for_lot(
        &mut self,
        supplier_id: SupplierId,
        framework_id: FrameworkId,
        lot_id: LotId,
    ) -> Result<bool, DomainError>;

    /// Inserts a draft, stamping ids and timestamps.
    ///
    /// # Errors
    ///
    /// - `FrameworkNotFound` / `LotNotFound` / `SupplierNotFound` for dangling references
    async fn insert_draft(&mut self, draft: &NewDraftService) -> Result<DraftService, DomainError>;

    /// Writes status, data and `updated_at`.
    ///
    /// # Errors
    ///
    /// - `DraftNotFound` if the draft doesn't exist
    async fn update_draft(&mut self, draft: &DraftService) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `DraftNotFound` if the draft doesn't exist
    async fn delete_draft(&mut self, id: DraftId) -> Result<(), DomainError>;

    /// Grouping columns of every draft on a framework.
    async fn list_draft_summaries(
        &mut self,
        framework_id: FrameworkId,
    ) -> Result<Vec<DraftSummary>, DomainError>;
}
