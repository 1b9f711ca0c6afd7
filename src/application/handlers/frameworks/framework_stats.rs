//! GetFrameworkStatsHandler - Application counts for a framework.

use std::sync::Arc;

use crate::application::ApplicationError;
use crate::domain::foundation::Timestamp;
use crate::domain::framework::FrameworkStats;
use crate::ports::{DraftServiceRepository, IsolationLevel, Store, SupplierRepository};

use super::get_framework::find_framework;

#[derive(Debug, Clone)]
pub struct GetFrameworkStatsQuery {
    pub slug: String,
}

pub struct GetFrameworkStatsHandler {
    store: Arc<dyn Store>,
}

impl GetFrameworkStatsHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetFrameworkStatsQuery) -> Result<FrameworkStats, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        let framework = find_framework(tx.as_mut(), &query.slug).await?;

        let drafts = tx.list_draft_summaries(framework.id).await?;
        let interests = tx.list_supplier_frameworks(framework.id).await?;
        let users = tx.list_supplier_users().await?;

        Ok(FrameworkStats::compute(&drafts, &interests, &users, Timestamp::now()))
    }
}
