//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::application::handlers::agreements::{
    CountersignAgreementHandler, CreateAgreementHandler, GetAgreementHandler,
    SignAgreementHandler, UpdateAgreementHandler,
};
use crate::application::handlers::audit::{CreateAuditEventHandler, ListAuditEventsHandler};
use crate::application::handlers::drafts::{
    CompleteDraftHandler, CopyDraftHandler, CopyServiceToDraftHandler, CreateDraftHandler,
    DeleteDraftHandler, GetDraftHandler, ListDraftsHandler, PublishDraftHandler,
    UpdateDraftHandler, UpdateDraftStatusHandler,
};
use crate::application::handlers::frameworks::{
    CreateFrameworkHandler, GetFrameworkHandler, GetFrameworkStatsHandler,
    ListFrameworkSuppliersHandler, ListFrameworksHandler, ListInterestedSuppliersHandler,
    UpdateFrameworkHandler,
};
use crate::application::handlers::services::{
    GetArchivedServiceHandler, GetServiceHandler, ImportServiceHandler,
    ListArchivedServicesHandler, ListServicesHandler, UpdateServiceHandler,
    UpdateServiceStatusHandler,
};
use crate::application::handlers::suppliers::{
    CreateSupplierHandler, GetInterestHandler, GetSupplierHandler, RegisterInterestHandler,
    SetDeclarationHandler, SetOnFrameworkHandler,
};
use crate::application::handlers::PageRequest;
use crate::ports::{SchemaValidator, SearchIndex, ServiceIdGenerator, Store};

/// Dependencies shared by every request.
///
/// Cloned per request; all ports are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub validator: Arc<dyn SchemaValidator>,
    pub search: Arc<dyn SearchIndex>,
    pub ids: Arc<dyn ServiceIdGenerator>,
    pub page_size: u64,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        validator: Arc<dyn SchemaValidator>,
        search: Arc<dyn SearchIndex>,
        ids: Arc<dyn ServiceIdGenerator>,
        page_size: u64,
    ) -> Self {
        Self {
            store,
            validator,
            search,
            ids,
            page_size,
        }
    }

    pub fn page(&self, number: i64) -> PageRequest {
        PageRequest::new(number, self.page_size)
    }

    // Frameworks

    pub fn list_frameworks_handler(&self) -> ListFrameworksHandler {
        ListFrameworksHandler::new(self.store.clone())
    }

    pub fn get_framework_handler(&self) -> GetFrameworkHandler {
        GetFrameworkHandler::new(self.store.clone())
    }

    pub fn create_framework_handler(&self) -> CreateFrameworkHandler {
        CreateFrameworkHandler::new(self.store.clone())
    }

    pub fn update_framework_handler(&self) -> UpdateFrameworkHandler {
        UpdateFrameworkHandler::new(self.store.clone(), self.validator.clone())
    }

    pub fn framework_stats_handler(&self) -> GetFrameworkStatsHandler {
        GetFrameworkStatsHandler::new(self.store.clone())
    }

    pub fn framework_suppliers_handler(&self) -> ListFrameworkSuppliersHandler {
        ListFrameworkSuppliersHandler::new(self.store.clone())
    }

    pub fn interested_suppliers_handler(&self) -> ListInterestedSuppliersHandler {
        ListInterestedSuppliersHandler::new(self.store.clone())
    }

    // Suppliers

    pub fn create_supplier_handler(&self) -> CreateSupplierHandler {
        CreateSupplierHandler::new(self.store.clone())
    }

    pub fn get_supplier_handler(&self) -> GetSupplierHandler {
        GetSupplierHandler::new(self.store.clone())
    }

    pub fn register_interest_handler(&self) -> RegisterInterestHandler {
        RegisterInterestHandler::new(self.store.clone())
    }

    pub fn get_interest_handler(&self) -> GetInterestHandler {
        GetInterestHandler::new(self.store.clone())
    }

    pub fn set_on_framework_handler(&self) -> SetOnFrameworkHandler {
        SetOnFrameworkHandler::new(self.store.clone())
    }

    pub fn set_declaration_handler(&self) -> SetDeclarationHandler {
        SetDeclarationHandler::new(self.store.clone())
    }

    // Agreements

    pub fn create_agreement_handler(&self) -> CreateAgreementHandler {
        CreateAgreementHandler::new(self.store.clone())
    }

    pub fn get_agreement_handler(&self) -> GetAgreementHandler {
        GetAgreementHandler::new(self.store.clone())
    }

    pub fn update_agreement_handler(&self) -> UpdateAgreementHandler {
        UpdateAgreementHandler::new(self.store.clone(), self.validator.clone())
    }

    pub fn sign_agreement_handler(&self) -> SignAgreementHandler {
        SignAgreementHandler::new(self.store.clone(), self.validator.clone())
    }

    pub fn countersign_agreement_handler(&self) -> CountersignAgreementHandler {
        CountersignAgreementHandler::new(self.store.clone())
    }

    // Services

    pub fn list_services_handler(&self) -> ListServicesHandler {
        ListServicesHandler::new(self.store.clone())
    }

    pub fn get_service_handler(&self) -> GetServiceHandler {
        GetServiceHandler::new(self.store.clone())
    }

    pub fn import_service_handler(&self) -> ImportServiceHandler {
        ImportServiceHandler::new(self.store.clone(), self.validator.clone(), self.search.clone())
    }

    pub fn update_service_handler(&self) -> UpdateServiceHandler {
        UpdateServiceHandler::new(self.store.clone(), self.validator.clone(), self.search.clone())
    }

    pub fn update_service_status_handler(&self) -> UpdateServiceStatusHandler {
        UpdateServiceStatusHandler::new(self.store.clone(), self.search.clone())
    }

    pub fn list_archived_services_handler(&self) -> ListArchivedServicesHandler {
        ListArchivedServicesHandler::new(self.store.clone())
    }

    pub fn get_archived_service_handler(&self) -> GetArchivedServiceHandler {
        GetArchivedServiceHandler::new(self.store.clone())
    }

    // Drafts

    pub fn list_drafts_handler(&self) -> ListDraftsHandler {
        ListDraftsHandler::new(self.store.clone())
    }

    pub fn get_draft_handler(&self) -> GetDraftHandler {
        GetDraftHandler::new(self.store.clone(), self.validator.clone())
    }

    pub fn create_draft_handler(&self) -> CreateDraftHandler {
        CreateDraftHandler::new(self.store.clone(), self.validator.clone())
    }

    pub fn copy_service_to_draft_handler(&self) -> CopyServiceToDraftHandler {
        CopyServiceToDraftHandler::new(self.store.clone())
    }

    pub fn copy_draft_handler(&self) -> CopyDraftHandler {
        CopyDraftHandler::new(self.store.clone())
    }

    pub fn update_draft_handler(&self) -> UpdateDraftHandler {
        UpdateDraftHandler::new(self.store.clone(), self.validator.clone())
    }

    pub fn delete_draft_handler(&self) -> DeleteDraftHandler {
        DeleteDraftHandler::new(self.store.clone())
    }

    pub fn complete_draft_handler(&self) -> CompleteDraftHandler {
        CompleteDraftHandler::new(self.store.clone(), self.validator.clone())
    }

    pub fn update_draft_status_handler(&self) -> UpdateDraftStatusHandler {
        UpdateDraftStatusHandler::new(self.store.clone())
    }

    pub fn publish_draft_handler(&self) -> PublishDraftHandler {
        PublishDraftHandler::new(self.store.clone(), self.search.clone(), self.ids.clone())
    }

    // Audit

    pub fn list_audit_events_handler(&self) -> ListAuditEventsHandler {
        ListAuditEventsHandler::new(self.store.clone())
    }

    pub fn create_audit_event_handler(&self) -> CreateAuditEventHandler {
        CreateAuditEventHandler::new(self.store.clone())
    }
}
