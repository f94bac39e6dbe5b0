//! Placeholder repository exposing the contract without behavior.

use async_trait::async_trait;
use tierstore_domain::{Operation, Query, RepositoryError, Result};

use super::traits::{DeleteRepository, GetRepository, PutRepository};

/// Every call fails with `MethodNotImplemented`, whatever the operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoidRepository;

#[async_trait]
impl<T: Send + 'static> GetRepository<T> for VoidRepository {
    async fn get(&self, _query: &Query, _operation: &Operation) -> Result<T> {
        Err(RepositoryError::MethodNotImplemented)
    }

    async fn get_all(&self, _query: &Query, _operation: &Operation) -> Result<Vec<T>> {
        Err(RepositoryError::MethodNotImplemented)
    }
}

#[async_trait]
impl<T: Send + 'static> PutRepository<T> for VoidRepository {
    async fn put(&self, _value: Option<T>, _query: &Query, _operation: &Operation) -> Result<T> {
        Err(RepositoryError::MethodNotImplemented)
    }

    async fn put_all(
        &self,
        _values: Option<Vec<T>>,
        _query: &Query,
        _operation: &Operation,
    ) -> Result<Vec<T>> {
        Err(RepositoryError::MethodNotImplemented)
    }
}

#[async_trait]
impl DeleteRepository for VoidRepository {
    async fn delete(&self, _query: &Query, _operation: &Operation) -> Result<()> {
        Err(RepositoryError::MethodNotImplemented)
    }

    async fn delete_all(&self, _query: &Query, _operation: &Operation) -> Result<()> {
        Err(RepositoryError::MethodNotImplemented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_void_repository() {
        let repo = VoidRepository;
        let query = Query::All;

        assert_eq!(
            GetRepository::<String>::get_all(&repo, &query, &Operation::Main).await,
            Err(RepositoryError::MethodNotImplemented)
        );
        assert_eq!(
            repo.put(Some(1u32), &query, &Operation::Default).await,
            Err(RepositoryError::MethodNotImplemented)
        );
        assert_eq!(
            repo.delete_all(&query, &Operation::cache()).await,
            Err(RepositoryError::MethodNotImplemented)
        );
    }
}
