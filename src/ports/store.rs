//! Transactional store port.
//!
//! Every repository operation runs inside a [`StoreTransaction`]. A handler
//! begins one, reads and writes through it, appends its audit event, then
//! commits. Dropping the transaction without committing rolls everything back,
//! so an early `?` return never leaves a partial write behind.
//!
//! # Example
//!
//! ```ignore
//! let mut tx = store.begin(IsolationLevel::Serializable).await?;
//! let mut draft = tx.find_draft(id).await?.ok_or(not_found)?;
//! draft.apply_update(&update, Timestamp::now());
//! tx.update_draft(&draft).await?;
//! tx.append_audit_event(&event).await?;
//! tx.commit().await?;
//! ```

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

use super::{
    AgreementRepository, AuditEventRepository, DraftServiceRepository, FrameworkRepository,
    ServiceRepository, SupplierRepository,
};

/// Isolation requested when a transaction begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    #[default]
    ReadCommitted,
    /// Concurrent conflicting writes fail with `SerializationFailure`.
    Serializable,
}

/// A slice of an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

impl Page {
    /// The 1-based `number`th page of `size` rows.
    pub fn number(number: u64, size: u64) -> Self {
        Self {
            offset: number.saturating_sub(1) * size,
            limit: size,
        }
    }

    /// Same page with one extra row, used to detect whether a next page exists.
    pub fn with_lookahead(self) -> Self {
        Self {
            offset: self.offset,
            limit: self.limit + 1,
        }
    }
}

/// Entry point of the persistence layer.
#[async_trait]
pub trait Store: Send + Sync {
    /// Begins a transaction at the given isolation level.
    async fn begin(&self, isolation: IsolationLevel) -> Result<Box<dyn StoreTransaction>, DomainError>;
}

/// An open unit of work over every repository.
#[async_trait]
pub trait StoreTransaction:
    FrameworkRepository
    + SupplierRepository
    + AgreementRepository
    + ServiceRepository
    + DraftServiceRepository
    + AuditEventRepository
    + Send
{
    /// Makes every write in this transaction durable.
    ///
    /// # Errors
    ///
    /// - `SerializationFailure` if a serializable transaction lost a race
    /// - `DatabaseError` on any other failure
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}
