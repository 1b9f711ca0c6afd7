//! Framework application statistics.
//!
//! Counts are computed from plain rows so every store produces the same
//! groupings. Each list is sorted by the string form of its columns.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::domain::foundation::{DraftStatus, SupplierId, Timestamp};
use crate::domain::supplier::{SupplierFramework, User};

/// Users who logged in within this many days count as recent.
pub const RECENT_LOGIN_DAYS: i64 = 7;

const DECLARATION_COMPLETE: &str = "complete";

/// The columns of a draft that statistics group on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftSummary {
    pub supplier_id: SupplierId,
    pub status: DraftStatus,
    pub lot_slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCount {
    pub status: DraftStatus,
    pub lot: String,
    pub declaration_made: bool,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterestCount {
    pub declaration_status: Option<String>,
    pub has_completed_services: bool,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplierUserCount {
    pub recent_login: Option<bool>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameworkStats {
    pub services: Vec<ServiceCount>,
    pub interested_suppliers: Vec<InterestCount>,
    pub supplier_users: Vec<SupplierUserCount>,
}

impl FrameworkStats {
    /// Computes statistics for one framework.
    ///
    /// `drafts` and `interests` must already be restricted to the framework;
    /// `users` are all supplier users.
    pub fn compute(
        drafts: &[DraftSummary],
        interests: &[SupplierFramework],
        users: &[User],
        now: Timestamp,
    ) -> Self {
        let declared: BTreeMap<SupplierId, Option<&str>> = interests
            .iter()
            .filter(|sf| sf.declaration.is_some())
            .map(|sf| (sf.supplier_id, sf.declaration_status()))
            .collect();

        let mut services: BTreeMap<(String, String, bool), (DraftStatus, u64)> = BTreeMap::new();
        for draft in drafts {
            if let Some(status) = declared.get(&draft.supplier_id) {
                let declaration_made = *status == Some(DECLARATION_COMPLETE);
                let key = (draft.status.as_str().to_string(), draft.lot_slug.clone(), declaration_made);
                services.entry(key).or_insert((draft.status, 0)).1 += 1;
            }
        }

        let completed: HashSet<SupplierId> = drafts
            .iter()
            .filter(|d| d.status.is_submitted())
            .map(|d| d.supplier_id)
            .collect();

        let mut interested: BTreeMap<(Option<String>, bool), u64> = BTreeMap::new();
        for (supplier_id, status) in &declared {
            let key = (status.map(str::to_string), completed.contains(supplier_id));
            *interested.entry(key).or_insert(0) += 1;
        }

        let cutoff = now.minus_days(RECENT_LOGIN_DAYS);
        let mut logins: BTreeMap<Option<bool>, u64> = BTreeMap::new();
        for user in users.iter().filter(|u| u.is_supplier()) {
            let recent = user.logged_in_at.map(|at| at.is_after(&cutoff));
            *logins.entry(recent).or_insert(0) += 1;
        }

        let mut services: Vec<ServiceCount> = services
            .into_iter()
            .map(|((_, lot, declaration_made), (status, count))| ServiceCount {
                status,
                lot,
                declaration_made,
                count,
            })
            .collect();
        services.sort_by_key(|c| {
            (c.status.as_str().to_string(), c.lot.clone(), label_bool(c.declaration_made), c.count.to_string())
        });

        let mut interested_suppliers: Vec<InterestCount> = interested
            .into_iter()
            .map(|((declaration_status, has_completed_services), count)| InterestCount {
                declaration_status,
                has_completed_services,
                count,
            })
            .collect();
        interested_suppliers.sort_by_key(|c| {
            (
                label_opt(c.declaration_status.as_deref()),
                label_bool(c.has_completed_services),
                c.count.to_string(),
            )
        });

        let mut supplier_users: Vec<SupplierUserCount> = logins
            .into_iter()
            .map(|(recent_login, count)| SupplierUserCount { recent_login, count })
            .collect();
        supplier_users.sort_by_key(|c| {
            (
                c.recent_login.map(label_bool).unwrap_or("None").to_string(),
                c.count.to_string(),
            )
        });

        Self {
            services,
            interested_suppliers,
            supplier_users,
        }
    }
}

fn label_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn label_opt(value: Option<&str>) -> String {
    value.unwrap_or("None").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{FrameworkId, UserId};
    use serde_json::json;

    fn interest(supplier: i64, status: Option<&str>) -> SupplierFramework {
        SupplierFramework {
            supplier_id: SupplierId::new(supplier),
            supplier_name: format!("Supplier {}", supplier),
            framework_id: FrameworkId::new(1),
            framework_slug: "g-cloud-7".to_string(),
            declaration: status.map(|s| json!({"status": s})),
            on_framework: None,
            agreement: None,
        }
    }

    fn draft(supplier: i64, status: DraftStatus, lot: &str) -> DraftSummary {
        DraftSummary {
            supplier_id: SupplierId::new(supplier),
            status,
            lot_slug: lot.to_string(),
        }
    }

    fn user(id: i64, role: &str, logged_in_at: Option<Timestamp>) -> User {
        User {
            id: UserId::new(id),
            email_address: format!("user{}@example.com", id),
            name: format!("User {}", id),
            role: role.to_string(),
            supplier_id: Some(SupplierId::new(1)),
            active: true,
            logged_in_at,
        }
    }

    #[test]
    fn drafts_are_grouped_by_status_lot_and_declaration() {
        let interests = vec![interest(1, Some("complete")), interest(2, Some("started")), interest(3, None)];
        let drafts = vec![
            draft(1, DraftStatus::Submitted, "scs"),
            draft(1, DraftStatus::Submitted, "scs"),
            draft(2, DraftStatus::NotSubmitted, "saas"),
            draft(3, DraftStatus::Submitted, "scs"),
        ];

        let stats = FrameworkStats::compute(&drafts, &interests, &[], Timestamp::now());

        assert_eq!(
            stats.services,
            vec![
                ServiceCount { status: DraftStatus::NotSubmitted, lot: "saas".into(), declaration_made: false, count: 1 },
                ServiceCount { status: DraftStatus::Submitted, lot: "scs".into(), declaration_made: true, count: 2 },
            ]
        );
    }

    #[test]
    fn interested_suppliers_track_completed_services() {
        let interests = vec![interest(1, Some("complete")), interest(2, Some("complete")), interest(3, Some("started"))];
        let drafts = vec![draft(1, DraftStatus::Submitted, "scs"), draft(2, DraftStatus::NotSubmitted, "scs")];

        let stats = FrameworkStats::compute(&drafts, &interests, &[], Timestamp::now());

        assert_eq!(
            stats.interested_suppliers,
            vec![
                InterestCount { declaration_status: Some("complete".into()), has_completed_services: false, count: 1 },
                InterestCount { declaration_status: Some("complete".into()), has_completed_services: true, count: 1 },
                InterestCount { declaration_status: Some("started".into()), has_completed_services: false, count: 1 },
            ]
        );
    }

    #[test]
    fn supplier_users_split_on_recent_login() {
        let now = Timestamp::now();
        let users = vec![
            user(1, "supplier", Some(now.minus_days(1))),
            user(2, "supplier", Some(now.minus_days(30))),
            user(3, "supplier", None),
            user(4, "admin", Some(now)),
        ];

        let stats = FrameworkStats::compute(&[], &[], &users, now);

        assert_eq!(
            stats.supplier_users,
            vec![
                SupplierUserCount { recent_login: Some(false), count: 1 },
                SupplierUserCount { recent_login: None, count: 1 },
                SupplierUserCount { recent_login: Some(true), count: 1 },
            ]
        );
    }
}
