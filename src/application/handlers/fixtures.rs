//! Shared fixtures for handler tests.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::adapters::ids::SequentialServiceIdGenerator;
use crate::adapters::memory::InMemoryStore;
use crate::adapters::search::RecordingSearchIndex;
use crate::adapters::validation::JsonSchemaValidator;
use crate::domain::foundation::{FrameworkStatus, ServiceId, ServiceStatus, SupplierId, Timestamp};
use crate::domain::framework::{Framework, NewFramework};
use crate::domain::service::{Service, ServiceData};
use crate::domain::supplier::Supplier;
use crate::ports::{
    FrameworkRepository, IsolationLevel, ServiceRepository, Store, SupplierRepository,
};

pub(crate) const SERVICE_ID: &str = "1234567890123456";

pub(crate) struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub validator: Arc<JsonSchemaValidator>,
    pub search: Arc<RecordingSearchIndex>,
    pub ids: Arc<SequentialServiceIdGenerator>,
}

impl Fixture {
    /// Supplier 1, an open G-Cloud 7 and an open Digital Outcomes and Specialists.
    pub async fn new() -> Self {
        Self::with_g7_status(FrameworkStatus::Open).await
    }

    pub async fn with_g7_status(status: FrameworkStatus) -> Self {
        let fixture = Self {
            store: Arc::new(InMemoryStore::new()),
            validator: Arc::new(JsonSchemaValidator::new()),
            search: Arc::new(RecordingSearchIndex::new()),
            ids: Arc::new(SequentialServiceIdGenerator::starting_at(1_234_567_890_123_457)),
        };
        fixture
            .add_framework("g-cloud-7", "G-Cloud 7", "g-cloud", status, &["saas", "scs"])
            .await;
        fixture
            .add_framework(
                "digital-outcomes-and-specialists",
                "Digital Outcomes and Specialists",
                "digital-outcomes-and-specialists",
                FrameworkStatus::Open,
                &["digital-outcomes", "digital-specialists"],
            )
            .await;
        fixture.add_supplier(1, "Supplier 1").await;
        fixture
    }

    pub async fn add_framework(
        &self,
        slug: &str,
        name: &str,
        family: &str,
        status: FrameworkStatus,
        lots: &[&str],
    ) -> Framework {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await.unwrap();
        let slugs: Vec<String> = lots.iter().map(|s| s.to_string()).collect();
        let lots = tx.find_lots(&slugs).await.unwrap();
        let framework = tx
            .insert_framework(&NewFramework {
                slug: slug.to_string(),
                name: name.to_string(),
                framework: family.to_string(),
                status,
                clarification_questions_open: false,
                lots,
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();
        framework
    }

    pub async fn add_supplier(&self, id: i64, name: &str) {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await.unwrap();
        tx.insert_supplier(&Supplier {
            supplier_id: SupplierId::new(id),
            name: name.to_string(),
            description: None,
        })
        .await
        .unwrap();
        tx.commit().await.unwrap();
    }

    /// Inserts a live G-Cloud 7 SCS service owned by supplier 1.
    pub async fn add_service(&self, id: &str, status: ServiceStatus) -> Service {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await.unwrap();
        let framework = tx.find_framework("g-cloud-7").await.unwrap().unwrap();
        let now = Timestamp::now();
        let service = Service {
            service_id: ServiceId::new(id).unwrap(),
            supplier_id: SupplierId::new(1),
            supplier_name: "Supplier 1".to_string(),
            framework: framework.summary(),
            lot: framework.lot("scs").cloned().unwrap(),
            status,
            data: g7_scs_data(),
            created_at: now,
            updated_at: now,
        };
        tx.insert_service(&service).await.unwrap();
        tx.archive_service(&service).await.unwrap();
        tx.commit().await.unwrap();
        service
    }

    /// Marks an already registered supplier as on G-Cloud 7.
    pub async fn set_on_framework(&self, supplier_id: i64) {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await.unwrap();
        let framework = tx.find_framework("g-cloud-7").await.unwrap().unwrap();
        let mut registration = tx
            .find_supplier_framework(SupplierId::new(supplier_id), framework.id)
            .await
            .unwrap()
            .unwrap();
        registration.on_framework = Some(true);
        tx.update_supplier_framework(&registration).await.unwrap();
        tx.commit().await.unwrap();
    }

    pub async fn set_agreement_version(&self, slug: &str, version: &str) {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await.unwrap();
        let mut framework = tx.find_framework(slug).await.unwrap().unwrap();
        framework.framework_agreement_details = Some(json!({"frameworkAgreementVersion": version}));
        tx.update_framework(&framework).await.unwrap();
        tx.commit().await.unwrap();
    }

    pub async fn set_framework_status(&self, slug: &str, status: FrameworkStatus) {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await.unwrap();
        let mut framework = tx.find_framework(slug).await.unwrap().unwrap();
        framework.status = status;
        tx.update_framework(&framework).await.unwrap();
        tx.commit().await.unwrap();
    }
}

pub(crate) fn object(value: Value) -> ServiceData {
    value.as_object().cloned().unwrap()
}

/// A complete G-Cloud 7 SCS service.
pub(crate) fn g7_scs_data() -> ServiceData {
    object(json!({
        "serviceName": "An example G-7 SCS Service",
        "serviceSummary": "This is my service summary",
        "serviceBenefits": ["Fast delivery", "Reliable"],
        "serviceFeatures": ["Supports things"],
        "serviceTypes": ["Implementation", "Planning"],
        "priceMin": "100",
        "priceMax": "200",
        "priceUnit": "Person",
        "priceInterval": "Day",
        "vatIncluded": true,
        "educationPricing": false,
        "termsAndConditionsDocumentURL": "https://assets.example.com/terms.pdf",
        "pricingDocumentURL": "https://assets.example.com/pricing.pdf",
        "serviceDefinitionDocumentURL": "https://assets.example.com/definition.pdf"
    }))
}

/// A complete Digital Specialists service offering one role.
pub(crate) fn dos_specialists_data() -> ServiceData {
    object(json!({
        "bespokeSystemInformation": true,
        "dataProtocols": true,
        "openStandardsPrinciples": true,
        "agileCoachLocations": ["London", "Offsite"],
        "agileCoachPriceMin": "100",
        "agileCoachPriceMax": "200"
    }))
}
