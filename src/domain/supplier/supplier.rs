//! Supplier and user records.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::foundation::{SupplierId, Timestamp, UserId};

/// Role held by users who act for a supplier.
pub const SUPPLIER_ROLE: &str = "supplier";

/// A company offering services on the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub supplier_id: SupplierId,
    pub name: String,
    pub description: Option<String>,
}

impl Supplier {
    pub fn to_document(&self) -> Value {
        json!({
            "id": self.supplier_id,
            "name": self.name,
            "description": self.description,
            "links": {"self": format!("/suppliers/{}", self.supplier_id)},
        })
    }
}

/// A user account. Accounts are managed elsewhere; this API only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email_address: String,
    pub name: String,
    pub role: String,
    pub supplier_id: Option<SupplierId>,
    pub active: bool,
    pub logged_in_at: Option<Timestamp>,
}

impl User {
    pub fn is_supplier(&self) -> bool {
        self.role == SUPPLIER_ROLE
    }
}
