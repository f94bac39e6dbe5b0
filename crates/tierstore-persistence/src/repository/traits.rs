//! # Repository Traits
//!
//! Caller-facing interfaces. Every call names the records it targets with a
//! [`Query`] and how the tiers are traversed with an [`Operation`].

use async_trait::async_trait;
use tierstore_domain::{Operation, Query, Result};

/// Read side of a repository.
#[async_trait]
pub trait GetRepository<T: Send + 'static>: Send + Sync {
    /// Get a single value.
    async fn get(&self, query: &Query, operation: &Operation) -> Result<T>;

    /// Get a collection of values.
    async fn get_all(&self, query: &Query, operation: &Operation) -> Result<Vec<T>>;
}

/// Write side of a repository.
#[async_trait]
pub trait PutRepository<T: Send + 'static>: Send + Sync {
    /// Store a value, returning it as held by the last tier written.
    async fn put(&self, value: Option<T>, query: &Query, operation: &Operation) -> Result<T>;

    /// Store a collection of values.
    async fn put_all(
        &self,
        values: Option<Vec<T>>,
        query: &Query,
        operation: &Operation,
    ) -> Result<Vec<T>>;
}

/// Delete side of a repository.
#[async_trait]
pub trait DeleteRepository: Send + Sync {
    async fn delete(&self, query: &Query, operation: &Operation) -> Result<()>;

    async fn delete_all(&self, query: &Query, operation: &Operation) -> Result<()>;
}

/// Full read/write/delete repository.
pub trait Repository<T: Send + 'static>:
    GetRepository<T> + PutRepository<T> + DeleteRepository
{
}

impl<T, R> Repository<T> for R
where
    T: Send + 'static,
    R: GetRepository<T> + PutRepository<T> + DeleteRepository + ?Sized,
{
}
