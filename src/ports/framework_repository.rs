//! Framework repository port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::framework::{Framework, Lot, NewFramework};

/// Frameworks and the lots attached to them.
#[async_trait]
pub trait FrameworkRepository: Send {
    /// All frameworks ordered by id, each with its lots.
    async fn list_frameworks(&mut self) -> Result<Vec<Framework>, DomainError>;

    /// Returns `None` if no framework has the slug.
    async fn find_framework(&mut self, slug: &str) -> Result<Option<Framework>, DomainError>;

    /// Lots matching the slugs, ordered by lot id. Unknown slugs are skipped.
    async fn find_lots(&mut self, slugs: &[String]) -> Result<Vec<Lot>, DomainError>;

    /// Inserts a framework and attaches its lots.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if the slug is taken
    /// - `DatabaseError` on persistence failure
    async fn insert_framework(&mut self, framework: &NewFramework) -> Result<Framework, DomainError>;

    /// Writes status, clarification flag and agreement details.
    ///
    /// # Errors
    ///
    /// - `FrameworkNotFound` if the framework doesn't exist
    async fn update_framework(&mut self, framework: &Framework) -> Result<(), DomainError>;
}
