//! Placeholder data source exposing the contract without behavior.

use async_trait::async_trait;
use tierstore_domain::{Query, RepositoryError, Result};

use super::{DeleteDataSource, GetDataSource, PutDataSource};

/// Every call fails with `MethodNotImplemented`.
///
/// Useful to fill a tier slot whose capability is never exercised, e.g. the
/// put side of a read-only main tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoidDataSource;

#[async_trait]
impl<T: Send + 'static> GetDataSource<T> for VoidDataSource {
    async fn get(&self, _query: &Query) -> Result<T> {
        Err(RepositoryError::MethodNotImplemented)
    }

    async fn get_all(&self, _query: &Query) -> Result<Vec<T>> {
        Err(RepositoryError::MethodNotImplemented)
    }
}

#[async_trait]
impl<T: Send + 'static> PutDataSource<T> for VoidDataSource {
    async fn put(&self, _value: Option<T>, _query: &Query) -> Result<T> {
        Err(RepositoryError::MethodNotImplemented)
    }

    async fn put_all(&self, _values: Option<Vec<T>>, _query: &Query) -> Result<Vec<T>> {
        Err(RepositoryError::MethodNotImplemented)
    }
}

#[async_trait]
impl DeleteDataSource for VoidDataSource {
    async fn delete(&self, _query: &Query) -> Result<()> {
        Err(RepositoryError::MethodNotImplemented)
    }

    async fn delete_all(&self, _query: &Query) -> Result<()> {
        Err(RepositoryError::MethodNotImplemented)
    }
}
