//! Suppliers, their users, and their registrations on frameworks.

mod supplier;
mod supplier_framework;

pub use supplier::{Supplier, User, SUPPLIER_ROLE};
pub use supplier_framework::SupplierFramework;
