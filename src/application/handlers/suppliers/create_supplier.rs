//! Supplier command and query handlers for the supplier record itself.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::application::handlers::support::supplier_id_from;
use crate::application::ApplicationError;
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::{CommandMetadata, SupplierId};
use crate::domain::supplier::Supplier;
use crate::ports::{AuditEventRepository, IsolationLevel, Store, SupplierRepository};

#[derive(Debug, Clone)]
pub struct CreateSupplierCommand {
    /// The `suppliers` object from the request.
    pub payload: Map<String, Value>,
}

pub struct CreateSupplierHandler {
    store: Arc<dyn Store>,
}

impl CreateSupplierHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: CreateSupplierCommand,
        metadata: CommandMetadata,
    ) -> Result<Supplier, ApplicationError> {
        let supplier_id = supplier_id_from(cmd.payload.get("id"))?;
        let name = cmd
            .payload
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApplicationError::bad_request("Supplier name is required"))?;
        let supplier = Supplier {
            supplier_id,
            name: name.to_string(),
            description: cmd.payload.get("description").and_then(Value::as_str).map(str::to_string),
        };

        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        tx.insert_supplier(&supplier).await?;

        let event = NewAuditEvent::new(
            AuditType::CreateSupplier,
            &metadata,
            json!({"supplierId": supplier.supplier_id, "supplierName": supplier.name}),
        )
        .for_object(AuditObject::supplier(supplier.supplier_id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(supplier_id = %supplier.supplier_id, "Supplier created");

        Ok(supplier)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetSupplierQuery {
    pub supplier_id: SupplierId,
}

pub struct GetSupplierHandler {
    store: Arc<dyn Store>,
}

impl GetSupplierHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetSupplierQuery) -> Result<Supplier, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        tx.find_supplier(query.supplier_id).await?.ok_or_else(|| {
            ApplicationError::not_found(format!("supplier_id '{}' not found", query.supplier_id))
        })
    }
}
