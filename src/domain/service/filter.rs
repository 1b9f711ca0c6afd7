//! Service listing filters and ordering.

use serde_json::Value;
use std::cmp::Ordering;

use crate::domain::foundation::{ServiceStatus, SupplierId};

use super::Service;

/// Lot whose services are filtered per specialist role.
pub const SPECIALISTS_LOT: &str = "digital-specialists";

/// Criteria for listing live services.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    pub supplier_id: Option<SupplierId>,

    /// Framework slugs to include. `None` means every live framework.
    pub framework_slugs: Option<Vec<String>>,

    /// Statuses to include. Empty means all.
    pub statuses: Vec<ServiceStatus>,

    pub lot: Option<String>,
    pub location: Option<String>,
    pub role: Option<String>,
}

impl ServiceFilter {
    /// Checks the combination rules for lot, location and role.
    ///
    /// # Errors
    ///
    /// Returns the client-facing message for an invalid combination.
    pub fn validate(&self) -> Result<(), String> {
        let is_specialists = self.lot.as_deref() == Some(SPECIALISTS_LOT);

        if self.location.is_some() && self.lot.is_none() {
            return Err("Lot must be specified to filter by location".to_string());
        }
        if self.role.is_some() && !is_specialists {
            return Err("Role only applies to Digital Specialists lot".to_string());
        }
        if is_specialists && self.location.is_some() && self.role.is_none() {
            return Err("Role must be specified for Digital Specialists".to_string());
        }
        Ok(())
    }

    /// Content key that holds the locations to match, if location or role filtering applies.
    pub fn location_key(&self) -> Option<String> {
        match (&self.role, &self.location) {
            (Some(role), _) => Some(format!("{}Locations", role)),
            (None, Some(_)) => Some("locations".to_string()),
            (None, None) => None,
        }
    }

    /// Orders listing by supplier when filtering by one, by id otherwise.
    pub fn order(&self) -> ServiceOrder {
        if self.supplier_id.is_some() {
            ServiceOrder::BySupplierListing
        } else {
            ServiceOrder::ById
        }
    }

    /// In-process equivalent of the store's query.
    pub fn matches(&self, service: &Service) -> bool {
        if let Some(supplier_id) = self.supplier_id {
            if service.supplier_id != supplier_id {
                return false;
            }
        }

        let framework_ok = match &self.framework_slugs {
            Some(slugs) => slugs.iter().any(|s| *s == service.framework.slug),
            None => service.framework.status.is_live(),
        };
        if !framework_ok {
            return false;
        }

        if !self.statuses.is_empty() && !self.statuses.contains(&service.status) {
            return false;
        }

        if let Some(lot) = &self.lot {
            if *lot != service.lot.slug {
                return false;
            }
        }

        if let Some(key) = self.location_key() {
            let Some(locations) = service.data.get(&key) else {
                return false;
            };
            if let Some(location) = &self.location {
                let found = locations
                    .as_array()
                    .map(|items| items.iter().any(|item| item.as_str() == Some(location.as_str())))
                    .unwrap_or(false);
                if !found {
                    return false;
                }
            }
        }

        true
    }
}

/// Sort orders for service listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOrder {
    /// Ascending service id.
    ById,
    /// Newest framework first, then lot, then service name.
    BySupplierListing,
}

/// Sorts services in memory the same way the database orders them.
pub fn sort_services(services: &mut [Service], order: ServiceOrder) {
    match order {
        ServiceOrder::ById => services.sort_by(|a, b| a.service_id.cmp(&b.service_id)),
        ServiceOrder::BySupplierListing => services.sort_by(|a, b| {
            b.framework
                .slug
                .cmp(&a.framework.slug)
                .then_with(|| a.lot.id.cmp(&b.lot.id))
                .then_with(|| compare_names(a, b))
        }),
    }
}

fn compare_names(a: &Service, b: &Service) -> Ordering {
    let name = |s: &Service| s.data.get("serviceName").and_then(Value::as_str).map(str::to_string);
    name(a).cmp(&name(b))
}
