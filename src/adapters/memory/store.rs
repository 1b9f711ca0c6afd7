//! In-memory implementation of the `Store` port.
//!
//! One `tokio::sync::Mutex` guards the whole state. A transaction holds the
//! lock for its lifetime and works on a copy, which is written back on
//! commit. Transactions are therefore fully serialized and a dropped
//! transaction leaves no trace.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::agreement::{FrameworkAgreement, NewFrameworkAgreement};
use crate::domain::audit::{AuditEvent, AuditQuery, NewAuditEvent};
use crate::domain::foundation::{
    AgreementId, ArchivedServiceId, AuditEventId, DomainError, DraftId, ErrorCode, FrameworkId,
    LotId, ServiceId, SupplierId, Timestamp, UserId,
};
use crate::domain::framework::{DraftSummary, Framework, Lot, NewFramework};
use crate::domain::service::{
    sort_services, ArchivedService, DraftService, NewDraftService, Service, ServiceFilter,
};
use crate::domain::supplier::{Supplier, SupplierFramework, User};
use crate::ports::{
    AgreementRepository, AuditEventRepository, DraftQuery, DraftServiceRepository,
    FrameworkRepository, IsolationLevel, Page, ServiceRepository, Store, StoreTransaction,
    SupplierRepository,
};

/// The lots every fresh database starts with.
pub fn seeded_lots() -> Vec<Lot> {
    [
        ("saas", "Software as a Service", false),
        ("paas", "Platform as a Service", false),
        ("iaas", "Infrastructure as a Service", false),
        ("scs", "Specialist Cloud Services", false),
        ("digital-outcomes", "Digital outcomes", true),
        ("digital-specialists", "Digital specialists", true),
        ("user-research-studios", "User research studios", true),
        ("user-research-participants", "User research participants", true),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (slug, name, one_service_limit))| Lot {
        id: LotId::new(i as i64 + 1),
        slug: slug.to_string(),
        name: name.to_string(),
        one_service_limit,
    })
    .collect()
}

#[derive(Debug, Clone, Default)]
struct Sequences {
    framework: i64,
    agreement: i64,
    archived_service: i64,
    draft: i64,
    audit_event: i64,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    frameworks: BTreeMap<FrameworkId, Framework>,
    lots: Vec<Lot>,
    suppliers: BTreeMap<SupplierId, Supplier>,
    supplier_frameworks: BTreeMap<(SupplierId, FrameworkId), SupplierFramework>,
    agreements: BTreeMap<AgreementId, FrameworkAgreement>,
    users: BTreeMap<UserId, User>,
    services: BTreeMap<ServiceId, Service>,
    archived_services: BTreeMap<ArchivedServiceId, ArchivedService>,
    drafts: BTreeMap<DraftId, DraftService>,
    audit_events: Vec<AuditEvent>,
    sequences: Sequences,
}

impl MemoryState {
    fn framework_by_id(&self, id: FrameworkId) -> Result<&Framework, DomainError> {
        self.frameworks.get(&id).ok_or_else(|| {
            DomainError::new(ErrorCode::FrameworkNotFound, format!("framework {} not found", id))
        })
    }

    fn supplier_name(&self, id: SupplierId) -> Result<String, DomainError> {
        self.suppliers
            .get(&id)
            .map(|s| s.name.clone())
            .ok_or_else(|| {
                DomainError::new(ErrorCode::SupplierNotFound, format!("supplier {} not found", id))
            })
    }

    /// Re-reads joined columns so rows reflect the current framework and supplier.
    fn hydrate_service(&self, mut service: Service) -> Service {
        if let Some(framework) = self.frameworks.get(&service.framework.id) {
            service.framework = framework.summary();
        }
        if let Some(supplier) = self.suppliers.get(&service.supplier_id) {
            service.supplier_name = supplier.name.clone();
        }
        service
    }

    fn hydrate_draft(&self, mut draft: DraftService) -> DraftService {
        if let Some(framework) = self.frameworks.get(&draft.framework.id) {
            draft.framework = framework.summary();
        }
        if let Some(supplier) = self.suppliers.get(&draft.supplier_id) {
            draft.supplier_name = supplier.name.clone();
        }
        draft
    }

    fn hydrate_supplier_framework(&self, mut sf: SupplierFramework) -> SupplierFramework {
        sf.agreement = self
            .agreements
            .values()
            .filter(|a| a.supplier_id == sf.supplier_id && a.framework_id == sf.framework_id)
            .max_by_key(|a| a.id)
            .cloned();
        if let Some(supplier) = self.suppliers.get(&sf.supplier_id) {
            sf.supplier_name = supplier.name.clone();
        }
        sf
    }
}

/// In-memory store with PostgreSQL-equivalent transaction behaviour.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    /// Creates an empty store with the standard lots.
    pub fn new() -> Self {
        let state = MemoryState {
            lots: seeded_lots(),
            ..MemoryState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Adds a user. Users are maintained outside this API.
    pub async fn add_user(&self, user: User) {
        self.state.lock().await.users.insert(user.id, user);
    }

    /// Number of audit events recorded (useful for tests).
    pub async fn audit_event_count(&self) -> usize {
        self.state.lock().await.audit_events.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn begin(
        &self,
        _isolation: IsolationLevel,
    ) -> Result<Box<dyn StoreTransaction>, DomainError> {
        let guard = self.state.clone().lock_owned().await;
        let working = (*guard).clone();
        Ok(Box::new(InMemoryTransaction { guard, working }))
    }
}

/// A transaction over [`InMemoryStore`].
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let InMemoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Frameworks
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl FrameworkRepository for InMemoryTransaction {
    async fn list_frameworks(&mut self) -> Result<Vec<Framework>, DomainError> {
        Ok(self.working.frameworks.values().cloned().collect())
    }

    async fn find_framework(&mut self, slug: &str) -> Result<Option<Framework>, DomainError> {
        Ok(self.working.frameworks.values().find(|f| f.slug == slug).cloned())
    }

    async fn find_lots(&mut self, slugs: &[String]) -> Result<Vec<Lot>, DomainError> {
        Ok(self
            .working
            .lots
            .iter()
            .filter(|lot| slugs.contains(&lot.slug))
            .cloned()
            .collect())
    }

    async fn insert_framework(&mut self, framework: &NewFramework) -> Result<Framework, DomainError> {
        if self.working.frameworks.values().any(|f| f.slug == framework.slug) {
            return Err(DomainError::new(
                ErrorCode::AlreadyExists,
                format!("Slug '{}' already in use", framework.slug),
            ));
        }
        self.working.sequences.framework += 1;
        let stored = Framework {
            id: FrameworkId::new(self.working.sequences.framework),
            slug: framework.slug.clone(),
            name: framework.name.clone(),
            framework: framework.framework.clone(),
            status: framework.status,
            clarification_questions_open: framework.clarification_questions_open,
            framework_agreement_details: None,
            lots: framework.lots.clone(),
        };
        self.working.frameworks.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_framework(&mut self, framework: &Framework) -> Result<(), DomainError> {
        let Some(existing) = self.working.frameworks.get_mut(&framework.id) else {
            return Err(DomainError::new(
                ErrorCode::FrameworkNotFound,
                format!("framework '{}' not found", framework.slug),
            ));
        };
        existing.status = framework.status;
        existing.clarification_questions_open = framework.clarification_questions_open;
        existing.framework_agreement_details = framework.framework_agreement_details.clone();
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Suppliers and users
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl SupplierRepository for InMemoryTransaction {
    async fn find_supplier(&mut self, id: SupplierId) -> Result<Option<Supplier>, DomainError> {
        Ok(self.working.suppliers.get(&id).cloned())
    }

    async fn insert_supplier(&mut self, supplier: &Supplier) -> Result<(), DomainError> {
        if self.working.suppliers.contains_key(&supplier.supplier_id) {
            return Err(DomainError::new(
                ErrorCode::AlreadyExists,
                format!("Supplier ID '{}' already exists", supplier.supplier_id),
            ));
        }
        self.working.suppliers.insert(supplier.supplier_id, supplier.clone());
        Ok(())
    }

    async fn find_supplier_framework(
        &mut self,
        supplier_id: SupplierId,
        framework_id: FrameworkId,
    ) -> Result<Option<SupplierFramework>, DomainError> {
        let found = self
            .working
            .supplier_frameworks
            .get(&(supplier_id, framework_id))
            .cloned();
        Ok(found.map(|sf| self.working.hydrate_supplier_framework(sf)))
    }

    async fn insert_supplier_framework(
        &mut self,
        supplier_framework: &SupplierFramework,
    ) -> Result<(), DomainError> {
        let key = (supplier_framework.supplier_id, supplier_framework.framework_id);
        if self.working.supplier_frameworks.contains_key(&key) {
            return Err(DomainError::new(
                ErrorCode::AlreadyExists,
                format!(
                    "supplier {} is already registered on framework '{}'",
                    supplier_framework.supplier_id, supplier_framework.framework_slug
                ),
            ));
        }
        let mut stored = supplier_framework.clone();
        stored.agreement = None;
        self.working.supplier_frameworks.insert(key, stored);
        Ok(())
    }

    async fn update_supplier_framework(
        &mut self,
        supplier_framework: &SupplierFramework,
    ) -> Result<(), DomainError> {
        let key = (supplier_framework.supplier_id, supplier_framework.framework_id);
        let Some(existing) = self.working.supplier_frameworks.get_mut(&key) else {
            return Err(DomainError::new(
                ErrorCode::SupplierNotFound,
                format!(
                    "supplier {} has not registered interest in '{}'",
                    supplier_framework.supplier_id, supplier_framework.framework_slug
                ),
            ));
        };
        existing.declaration = supplier_framework.declaration.clone();
        existing.on_framework = supplier_framework.on_framework;
        Ok(())
    }

    async fn list_supplier_frameworks(
        &mut self,
        framework_id: FrameworkId,
    ) -> Result<Vec<SupplierFramework>, DomainError> {
        let rows: Vec<SupplierFramework> = self
            .working
            .supplier_frameworks
            .values()
            .filter(|sf| sf.framework_id == framework_id)
            .cloned()
            .collect();
        Ok(rows
            .into_iter()
            .map(|sf| self.working.hydrate_supplier_framework(sf))
            .collect())
    }

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.working.users.get(&id).cloned())
    }

    async fn list_supplier_users(&mut self) -> Result<Vec<User>, DomainError> {
        Ok(self
            .working
            .users
            .values()
            .filter(|u| u.is_supplier())
            .cloned()
            .collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Agreements
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl AgreementRepository for InMemoryTransaction {
    async fn find_agreement(
        &mut self,
        id: AgreementId,
    ) -> Result<Option<FrameworkAgreement>, DomainError> {
        Ok(self.working.agreements.get(&id).cloned())
    }

    async fn insert_agreement(
        &mut self,
        agreement: &NewFrameworkAgreement,
    ) -> Result<FrameworkAgreement, DomainError> {
        let key = (agreement.supplier_id, agreement.framework_id);
        if !self.working.supplier_frameworks.contains_key(&key) {
            return Err(DomainError::new(
                ErrorCode::SupplierNotFound,
                format!(
                    "supplier {} is not registered on framework {}",
                    agreement.supplier_id, agreement.framework_id
                ),
            ));
        }
        if self
            .working
            .agreements
            .values()
            .any(|a| a.supplier_id == agreement.supplier_id && a.framework_id == agreement.framework_id)
        {
            return Err(DomainError::new(
                ErrorCode::AlreadyExists,
                format!(
                    "supplier {} already has an agreement for framework {}",
                    agreement.supplier_id, agreement.framework_id
                ),
            ));
        }

        let slug = self.working.framework_by_id(agreement.framework_id)?.slug.clone();
        self.working.sequences.agreement += 1;
        let stored = FrameworkAgreement::new(
            AgreementId::new(self.working.sequences.agreement),
            agreement.supplier_id,
            agreement.framework_id,
            slug,
        );
        self.working.agreements.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_agreement(&mut self, agreement: &FrameworkAgreement) -> Result<(), DomainError> {
        let Some(existing) = self.working.agreements.get_mut(&agreement.id) else {
            return Err(DomainError::new(
                ErrorCode::AgreementNotFound,
                format!("agreement {} not found", agreement.id),
            ));
        };
        *existing = agreement.clone();
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Services
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl ServiceRepository for InMemoryTransaction {
    async fn find_service(&mut self, id: &ServiceId) -> Result<Option<Service>, DomainError> {
        let found = self.working.services.get(id).cloned();
        Ok(found.map(|s| self.working.hydrate_service(s)))
    }

    async fn service_exists(&mut self, id: &ServiceId) -> Result<bool, DomainError> {
        Ok(self.working.services.contains_key(id))
    }

    async fn insert_service(&mut self, service: &Service) -> Result<(), DomainError> {
        if self.working.services.contains_key(&service.service_id) {
            return Err(DomainError::new(
                ErrorCode::AlreadyExists,
                format!("service {} already exists", service.service_id),
            ));
        }
        self.working
            .services
            .insert(service.service_id.clone(), service.clone());
        Ok(())
    }

    async fn update_service(&mut self, service: &Service) -> Result<(), DomainError> {
        let Some(existing) = self.working.services.get_mut(&service.service_id) else {
            return Err(DomainError::new(
                ErrorCode::ServiceNotFound,
                format!("service {} not found", service.service_id),
            ));
        };
        existing.status = service.status;
        existing.data = service.data.clone();
        existing.updated_at = service.updated_at;
        Ok(())
    }

    async fn list_services(
        &mut self,
        filter: &ServiceFilter,
        page: Option<Page>,
    ) -> Result<Vec<Service>, DomainError> {
        let mut services: Vec<Service> = self
            .working
            .services
            .values()
            .cloned()
            .map(|s| self.working.hydrate_service(s))
            .filter(|s| filter.matches(s))
            .collect();
        sort_services(&mut services, filter.order());

        Ok(match page {
            Some(page) => services
                .into_iter()
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .collect(),
            None => services,
        })
    }

    async fn count_services(&mut self, filter: &ServiceFilter) -> Result<u64, DomainError> {
        Ok(self
            .working
            .services
            .values()
            .cloned()
            .map(|s| self.working.hydrate_service(s))
            .filter(|s| filter.matches(s))
            .count() as u64)
    }

    async fn archive_service(&mut self, service: &Service) -> Result<ArchivedServiceId, DomainError> {
        self.working.sequences.archived_service += 1;
        let id = ArchivedServiceId::new(self.working.sequences.archived_service);
        self.working.archived_services.insert(
            id,
            ArchivedService {
                id,
                service: service.clone(),
            },
        );
        Ok(id)
    }

    async fn find_archived_service(
        &mut self,
        id: ArchivedServiceId,
    ) -> Result<Option<ArchivedService>, DomainError> {
        Ok(self.working.archived_services.get(&id).cloned())
    }

    async fn list_archived_services(
        &mut self,
        service_id: &ServiceId,
    ) -> Result<Vec<ArchivedService>, DomainError> {
        Ok(self
            .working
            .archived_services
            .values()
            .filter(|a| a.service.service_id == *service_id)
            .cloned()
            .collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Drafts
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl DraftServiceRepository for InMemoryTransaction {
    async fn find_draft(&mut self, id: DraftId) -> Result<Option<DraftService>, DomainError> {
        let found = self.working.drafts.get(&id).cloned();
        Ok(found.map(|d| self.working.hydrate_draft(d)))
    }

    async fn list_drafts(&mut self, query: &DraftQuery) -> Result<Vec<DraftService>, DomainError> {
        let drafts: Vec<DraftService> = self
            .working
            .drafts
            .values()
            .filter(|d| query.matches(d))
            .cloned()
            .collect();
        Ok(drafts
            .into_iter()
            .map(|d| self.working.hydrate_draft(d))
            .collect())
    }

    async fn draft_exists_for_service(&mut self, service_id: &ServiceId) -> Result<bool, DomainError> {
        Ok(self
            .working
            .drafts
            .values()
            .any(|d| d.service_id.as_ref() == Some(service_id)))
    }

    async fn draft_exists_for_lot(
        &mut self,
        supplier_id: SupplierId,
        framework_id: FrameworkId,
        lot_id: LotId,
    ) -> Result<bool, DomainError> {
        Ok(self.working.drafts.values().any(|d| {
            d.supplier_id == supplier_id && d.framework.id == framework_id && d.lot.id == lot_id
        }))
    }

    async fn insert_draft(&mut self, draft: &NewDraftService) -> Result<DraftService, DomainError> {
        let framework = self.working.framework_by_id(draft.framework_id)?;
        let lot = framework
            .lots
            .iter()
            .find(|l| l.id == draft.lot_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::new(ErrorCode::LotNotFound, format!("lot {} not found", draft.lot_id))
            })?;
        let summary = framework.summary();
        let supplier_name = self.working.supplier_name(draft.supplier_id)?;

        self.working.sequences.draft += 1;
        let now = Timestamp::now();
        let stored = DraftService {
            id: DraftId::new(self.working.sequences.draft),
            service_id: draft.service_id.clone(),
            supplier_id: draft.supplier_id,
            supplier_name,
            framework: summary,
            lot,
            status: draft.status,
            data: draft.data.clone(),
            created_at: now,
            updated_at: now,
        };
        self.working.drafts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_draft(&mut self, draft: &DraftService) -> Result<(), DomainError> {
        let Some(existing) = self.working.drafts.get_mut(&draft.id) else {
            return Err(DomainError::new(
                ErrorCode::DraftNotFound,
                format!("draft {} not found", draft.id),
            ));
        };
        existing.status = draft.status;
        existing.data = draft.data.clone();
        existing.updated_at = draft.updated_at;
        Ok(())
    }

    async fn delete_draft(&mut self, id: DraftId) -> Result<(), DomainError> {
        self.working.drafts.remove(&id).map(|_| ()).ok_or_else(|| {
            DomainError::new(ErrorCode::DraftNotFound, format!("draft {} not found", id))
        })
    }

    async fn list_draft_summaries(
        &mut self,
        framework_id: FrameworkId,
    ) -> Result<Vec<DraftSummary>, DomainError> {
        Ok(self
            .working
            .drafts
            .values()
            .filter(|d| d.framework.id == framework_id)
            .map(DraftService::summary)
            .collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Audit events
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl AuditEventRepository for InMemoryTransaction {
    async fn append_audit_event(&mut self, event: &NewAuditEvent) -> Result<AuditEvent, DomainError> {
        self.working.sequences.audit_event += 1;
        let stored = AuditEvent {
            id: AuditEventId::new(self.working.sequences.audit_event),
            audit_type: event.audit_type,
            user: event.user.clone(),
            data: event.data.clone(),
            object: event.object.clone(),
            created_at: Timestamp::now(),
        };
        self.working.audit_events.push(stored.clone());
        Ok(stored)
    }

    async fn list_audit_events(&mut self, query: &AuditQuery) -> Result<Vec<AuditEvent>, DomainError> {
        let mut events: Vec<AuditEvent> = self
            .working
            .audit_events
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();
        if query.latest_first {
            events.reverse();
        }
        Ok(events
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn count_audit_events(&mut self, query: &AuditQuery) -> Result<u64, DomainError> {
        Ok(self
            .working
            .audit_events
            .iter()
            .filter(|e| query.matches(e))
            .count() as u64)
    }
}
