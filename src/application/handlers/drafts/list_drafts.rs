//! ListDraftsHandler - Query handler for a supplier's drafts.

use std::sync::Arc;

use crate::application::ApplicationError;
use crate::domain::foundation::{ServiceId, SupplierId};
use crate::domain::service::DraftService;
use crate::ports::{
    DraftQuery, DraftServiceRepository, FrameworkRepository, IsolationLevel, Store,
    SupplierRepository,
};

#[derive(Debug, Clone)]
pub struct ListDraftsQuery {
    pub supplier_id: SupplierId,
    pub framework: Option<String>,
    pub service_id: Option<ServiceId>,
}

pub struct ListDraftsHandler {
    store: Arc<dyn Store>,
}

impl ListDraftsHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: ListDraftsQuery) -> Result<Vec<DraftService>, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        if tx.find_supplier(query.supplier_id).await?.is_none() {
            return Err(ApplicationError::not_found(format!(
                "supplier_id '{}' not found",
                query.supplier_id
            )));
        }

        let framework_id = match &query.framework {
            Some(slug) => {
                let framework = tx.find_framework(slug).await?.ok_or_else(|| {
                    ApplicationError::not_found(format!("framework '{}' not found", slug))
                })?;
                Some(framework.id)
            }
            None => None,
        };

        let drafts = tx
            .list_drafts(&DraftQuery {
                supplier_id: query.supplier_id,
                framework_id,
                service_id: query.service_id,
            })
            .await?;

        Ok(drafts)
    }
}
