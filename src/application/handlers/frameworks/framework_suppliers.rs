//! Query handlers for the suppliers registered on a framework.

use std::sync::Arc;

use crate::application::ApplicationError;
use crate::domain::agreement::AgreementStatus;
use crate::domain::foundation::SupplierId;
use crate::domain::supplier::SupplierFramework;
use crate::ports::{IsolationLevel, Store, SupplierRepository};

use super::get_framework::find_framework;

#[derive(Debug, Clone, Default)]
pub struct ListFrameworkSuppliersQuery {
    pub slug: String,

    /// Keep only rows whose agreement has (`true`) or has not (`false`) been returned.
    pub agreement_returned: Option<bool>,

    /// Keep only rows whose agreement is in one of these statuses.
    pub statuses: Option<Vec<AgreementStatus>>,
}

pub struct ListFrameworkSuppliersHandler {
    store: Arc<dyn Store>,
}

impl ListFrameworkSuppliersHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Rows ordered by agreement return time (unreturned first), then supplier id.
    pub async fn handle(
        &self,
        query: ListFrameworkSuppliersQuery,
    ) -> Result<Vec<SupplierFramework>, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        let framework = find_framework(tx.as_mut(), &query.slug).await?;

        let mut rows: Vec<SupplierFramework> = tx
            .list_supplier_frameworks(framework.id)
            .await?
            .into_iter()
            .filter(|sf| {
                query
                    .agreement_returned
                    .map_or(true, |returned| sf.agreement_returned() == returned)
            })
            .filter(|sf| match &query.statuses {
                Some(statuses) => sf
                    .agreement
                    .as_ref()
                    .map_or(false, |a| statuses.contains(&a.status())),
                None => true,
            })
            .collect();

        rows.sort_by_key(|sf| {
            (
                sf.agreement.as_ref().and_then(|a| a.signed_agreement_returned_at),
                sf.supplier_id,
            )
        });
        Ok(rows)
    }
}

#[derive(Debug, Clone)]
pub struct ListInterestedSuppliersQuery {
    pub slug: String,
}

pub struct ListInterestedSuppliersHandler {
    store: Arc<dyn Store>,
}

impl ListInterestedSuppliersHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: ListInterestedSuppliersQuery,
    ) -> Result<Vec<SupplierId>, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        let framework = find_framework(tx.as_mut(), &query.slug).await?;

        let mut ids: Vec<SupplierId> = tx
            .list_supplier_frameworks(framework.id)
            .await?
            .into_iter()
            .map(|sf| sf.supplier_id)
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::agreements::{
        CreateAgreementCommand, CreateAgreementHandler, SignAgreementCommand, SignAgreementHandler,
    };
    use crate::application::handlers::fixtures::Fixture;
    use crate::application::handlers::suppliers::{RegisterInterestCommand, RegisterInterestHandler};
    use crate::domain::foundation::CommandMetadata;

    async fn register(fixture: &Fixture, supplier: i64) {
        RegisterInterestHandler::new(fixture.store.clone())
            .handle(
                RegisterInterestCommand {
                    supplier_id: SupplierId::new(supplier),
                    framework_slug: "g-cloud-7".into(),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();
    }

    async fn fixture() -> Fixture {
        let fixture = Fixture::new().await;
        fixture.add_supplier(2, "Supplier 2").await;
        fixture.add_supplier(3, "Supplier 3").await;
        for supplier in [3, 1, 2] {
            register(&fixture, supplier).await;
        }
        fixture
    }

    #[tokio::test]
    async fn interested_suppliers_are_sorted() {
        let fixture = fixture().await;

        let ids = ListInterestedSuppliersHandler::new(fixture.store.clone())
            .handle(ListInterestedSuppliersQuery { slug: "g-cloud-7".into() })
            .await
            .unwrap();

        assert_eq!(ids, vec![SupplierId::new(1), SupplierId::new(2), SupplierId::new(3)]);
    }

    #[tokio::test]
    async fn filters_by_returned_agreement_and_status() {
        let fixture = fixture().await;
        fixture.set_on_framework(2).await;
        let agreement = CreateAgreementHandler::new(fixture.store.clone())
            .handle(
                CreateAgreementCommand { supplier_id: SupplierId::new(2), framework_slug: "g-cloud-7".into() },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();
        SignAgreementHandler::new(fixture.store.clone(), fixture.validator.clone())
            .handle(
                SignAgreementCommand { agreement_id: agreement.id, signed_agreement_details: None },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();
        let handler = ListFrameworkSuppliersHandler::new(fixture.store.clone());

        let all = handler
            .handle(ListFrameworkSuppliersQuery { slug: "g-cloud-7".into(), ..Default::default() })
            .await
            .unwrap();
        let order: Vec<i64> = all.iter().map(|sf| sf.supplier_id.value()).collect();
        assert_eq!(order, vec![1, 3, 2]);

        let returned = handler
            .handle(ListFrameworkSuppliersQuery {
                slug: "g-cloud-7".into(),
                agreement_returned: Some(true),
                statuses: None,
            })
            .await
            .unwrap();
        assert_eq!(returned.len(), 1);

        let signed = handler
            .handle(ListFrameworkSuppliersQuery {
                slug: "g-cloud-7".into(),
                agreement_returned: None,
                statuses: Some(vec![AgreementStatus::Signed]),
            })
            .await
            .unwrap();
        assert_eq!(signed[0].supplier_id, SupplierId::new(2));
    }
}
