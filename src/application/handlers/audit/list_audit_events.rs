use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::handlers::paging::{PageRequest, Paginated};
use crate::application::ApplicationError;
use crate::domain::audit::{AuditEvent, AuditObject, AuditObjectType, AuditQuery, AuditType};
use crate::ports::{AuditEventRepository, IsolationLevel, Store};

/// Raw filter values as given on the query string.
#[derive(Debug, Clone)]
pub struct ListAuditEventsQuery {
    pub audit_type: Option<String>,
    pub audit_date: Option<String>,
    pub object_type: Option<String>,
    pub object_id: Option<String>,
    pub latest_first: bool,
    pub page: PageRequest,
}

impl ListAuditEventsQuery {
    fn criteria(&self) -> Result<AuditQuery, ApplicationError> {
        let audit_type = self
            .audit_type
            .as_deref()
            .map(str::parse::<AuditType>)
            .transpose()?;

        let date = self
            .audit_date
            .as_deref()
            .map(|d| {
                NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .map_err(|_| ApplicationError::bad_request(format!("invalid audit-date '{}'", d)))
            })
            .transpose()?;

        let object = match (&self.object_type, &self.object_id) {
            (None, None) => None,
            (Some(kind), Some(id)) => {
                let kind = AuditObjectType::parse(kind).ok_or_else(|| {
                    ApplicationError::bad_request(format!("invalid object-type '{}'", kind))
                })?;
                Some(AuditObject::new(kind, id.clone()))
            }
            _ => {
                return Err(ApplicationError::bad_request(
                    "object-type and object-id must be given together",
                ))
            }
        };

        let page = self.page.lookahead()?;
        Ok(AuditQuery {
            audit_type,
            date,
            object,
            latest_first: self.latest_first,
            offset: page.offset,
            limit: page.limit,
        })
    }
}

pub struct ListAuditEventsHandler {
    store: Arc<dyn Store>,
}

impl ListAuditEventsHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: ListAuditEventsQuery,
    ) -> Result<Paginated<AuditEvent>, ApplicationError> {
        let criteria = query.criteria()?;
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        let events = tx.list_audit_events(&criteria).await?;
        let total = tx.count_audit_events(&criteria).await?;
        query.page.finish(events, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::Fixture;
    use crate::domain::audit::NewAuditEvent;
    use crate::domain::foundation::{CommandMetadata, SupplierId};
    use serde_json::json;

    fn query() -> ListAuditEventsQuery {
        ListAuditEventsQuery {
            audit_type: None,
            audit_date: None,
            object_type: None,
            object_id: None,
            latest_first: false,
            page: PageRequest::new(1, 2),
        }
    }

    async fn seed(fixture: &Fixture) {
        let mut tx = fixture.store.begin(IsolationLevel::ReadCommitted).await.unwrap();
        for (audit_type, supplier) in [
            (AuditType::CreateSupplier, 1),
            (AuditType::SupplierUpdate, 1),
            (AuditType::CreateSupplier, 2),
        ] {
            let event = NewAuditEvent::new(audit_type, &CommandMetadata::test_fixture(), json!({}))
                .for_object(AuditObject::supplier(SupplierId::new(supplier)));
            tx.append_audit_event(&event).await.unwrap();
        }
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn pages_through_events() {
        let fixture = Fixture::new().await;
        seed(&fixture).await;
        let handler = ListAuditEventsHandler::new(fixture.store.clone());

        let first = handler.handle(query()).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert!(first.has_next);
        assert_eq!(first.last_page, 2);

        let second = handler
            .handle(ListAuditEventsQuery { page: PageRequest::new(2, 2), ..query() })
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(!second.has_next);
    }

    #[tokio::test]
    async fn filters_by_type_and_object() {
        let fixture = Fixture::new().await;
        seed(&fixture).await;
        let handler = ListAuditEventsHandler::new(fixture.store.clone());

        let created = handler
            .handle(ListAuditEventsQuery { audit_type: Some("create_supplier".into()), ..query() })
            .await
            .unwrap();
        assert!(created.items.iter().all(|e| e.audit_type == AuditType::CreateSupplier));

        let supplier_one = handler
            .handle(ListAuditEventsQuery {
                object_type: Some("Supplier".into()),
                object_id: Some("1".into()),
                latest_first: true,
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(supplier_one.items[0].audit_type, AuditType::SupplierUpdate);
    }

    #[tokio::test]
    async fn rejects_bad_filters() {
        let fixture = Fixture::new().await;
        let handler = ListAuditEventsHandler::new(fixture.store.clone());

        let bad_type = handler
            .handle(ListAuditEventsQuery { audit_type: Some("not_a_type".into()), ..query() })
            .await
            .unwrap_err();
        assert!(matches!(bad_type, ApplicationError::BadRequest(_)));

        let bad_date = handler
            .handle(ListAuditEventsQuery { audit_date: Some("2015-13-45".into()), ..query() })
            .await
            .unwrap_err();
        assert!(matches!(bad_date, ApplicationError::BadRequest(_)));
    }

    #[tokio::test]
    async fn empty_page_beyond_first_is_not_found() {
        let fixture = Fixture::new().await;

        let err = ListAuditEventsHandler::new(fixture.store.clone())
            .handle(ListAuditEventsQuery { page: PageRequest::new(3, 2), ..query() })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::NotFound(_)));
    }
}
