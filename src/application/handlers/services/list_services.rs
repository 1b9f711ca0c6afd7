//! ListServicesHandler - Query handler for browsing live services.

use std::sync::Arc;

use crate::application::handlers::paging::{PageRequest, Paginated};
use crate::application::ApplicationError;
use crate::domain::service::{Service, ServiceFilter};
use crate::ports::{IsolationLevel, ServiceRepository, Store, SupplierRepository};

#[derive(Debug, Clone)]
pub struct ListServicesQuery {
    pub filter: ServiceFilter,

    /// Ignored when filtering by supplier, which returns every match.
    pub page: PageRequest,
}

pub struct ListServicesHandler {
    store: Arc<dyn Store>,
}

impl ListServicesHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: ListServicesQuery) -> Result<Paginated<Service>, ApplicationError> {
        query.filter.validate().map_err(ApplicationError::BadRequest)?;

        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        if let Some(supplier_id) = query.filter.supplier_id {
            if tx.find_supplier(supplier_id).await?.is_none() {
                return Err(ApplicationError::not_found(format!(
                    "supplier_id '{}' not found",
                    supplier_id
                )));
            }
            let services = tx.list_services(&query.filter, None).await?;
            return Ok(Paginated::all(services));
        }

        let rows = tx
            .list_services(&query.filter, Some(query.page.lookahead()?))
            .await?;
        let total = tx.count_services(&query.filter).await?;
        query.page.finish(rows, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::Fixture;
    use crate::domain::foundation::{FrameworkStatus, ServiceStatus, SupplierId};

    async fn fixture_with_services(count: u64) -> Fixture {
        let fixture = Fixture::with_g7_status(FrameworkStatus::Live).await;
        for i in 0..count {
            fixture
                .add_service(&format!("{}", 1_000_000_000u64 + i), ServiceStatus::Published)
                .await;
        }
        fixture
    }

    fn query(filter: ServiceFilter, page: i64) -> ListServicesQuery {
        ListServicesQuery { filter, page: PageRequest::new(page, 2) }
    }

    #[tokio::test]
    async fn paginates_by_id() {
        let fixture = fixture_with_services(3).await;
        let handler = ListServicesHandler::new(fixture.store.clone());

        let first = handler.handle(query(ServiceFilter::default(), 1)).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert!(first.has_next);
        assert_eq!(first.last_page, 2);
        assert_eq!(first.items[0].service_id.as_str(), "1000000000");

        let second = handler.handle(query(ServiceFilter::default(), 2)).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(!second.has_next);

        let beyond = handler.handle(query(ServiceFilter::default(), 3)).await;
        assert!(matches!(beyond, Err(ApplicationError::NotFound(_))));

        let negative = handler.handle(query(ServiceFilter::default(), -1)).await;
        assert!(matches!(negative, Err(ApplicationError::NotFound(_))));
    }

    #[tokio::test]
    async fn supplier_listing_is_unpaginated() {
        let fixture = fixture_with_services(3).await;
        let filter = ServiceFilter { supplier_id: Some(SupplierId::new(1)), ..Default::default() };

        let page = ListServicesHandler::new(fixture.store.clone())
            .handle(query(filter, 1))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 3);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn unknown_supplier_is_not_found() {
        let fixture = fixture_with_services(0).await;
        let filter = ServiceFilter { supplier_id: Some(SupplierId::new(7)), ..Default::default() };

        let err = ListServicesHandler::new(fixture.store.clone())
            .handle(query(filter, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::NotFound(_)));
    }

    #[tokio::test]
    async fn location_without_lot_is_rejected() {
        let fixture = fixture_with_services(0).await;
        let filter = ServiceFilter { location: Some("London".into()), ..Default::default() };

        let err = ListServicesHandler::new(fixture.store.clone())
            .handle(query(filter, 1))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Lot must be specified to filter by location");
    }
}
