//! Query handlers for reading frameworks.

use std::sync::Arc;

use crate::application::ApplicationError;
use crate::domain::framework::Framework;
use crate::ports::{FrameworkRepository, IsolationLevel, Store};

pub struct ListFrameworksHandler {
    store: Arc<dyn Store>,
}

impl ListFrameworksHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<Vec<Framework>, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        Ok(tx.list_frameworks().await?)
    }
}

#[derive(Debug, Clone)]
pub struct GetFrameworkQuery {
    pub slug: String,
}

pub struct GetFrameworkHandler {
    store: Arc<dyn Store>,
}

impl GetFrameworkHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetFrameworkQuery) -> Result<Framework, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        find_framework(tx.as_mut(), &query.slug).await
    }
}

/// Loads a framework by slug, or `NotFound`.
pub(crate) async fn find_framework<R>(repo: &mut R, slug: &str) -> Result<Framework, ApplicationError>
where
    R: FrameworkRepository + ?Sized,
{
    repo.find_framework(slug)
        .await?
        .ok_or_else(|| ApplicationError::not_found(format!("framework '{}' not found", slug)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::Fixture;

    #[tokio::test]
    async fn lists_and_gets_frameworks() {
        let fixture = Fixture::new().await;

        let all = ListFrameworksHandler::new(fixture.store.clone()).handle().await.unwrap();
        assert_eq!(all.len(), 2);

        let one = GetFrameworkHandler::new(fixture.store.clone())
            .handle(GetFrameworkQuery { slug: "g-cloud-7".into() })
            .await
            .unwrap();
        assert_eq!(one.name, "G-Cloud 7");
    }

    #[tokio::test]
    async fn missing_framework_is_not_found() {
        let fixture = Fixture::new().await;

        let err = GetFrameworkHandler::new(fixture.store.clone())
            .handle(GetFrameworkQuery { slug: "nope".into() })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "framework 'nope' not found");
    }
}
