//! # Data Source Module
//!
//! Capability contracts a storage backend exposes to the repository layer,
//! plus the backends shipped with this crate.
//!
//! A backend may implement only the capabilities it supports; repositories
//! require exactly the capabilities their operations call.

pub mod in_memory;
pub mod mapper;
pub mod void;

use std::sync::Arc;

use async_trait::async_trait;
use tierstore_domain::{Query, Result};

pub use in_memory::InMemoryDataSource;
pub use mapper::DataSourceMapper;
pub use void::VoidDataSource;

/// Read capability.
#[async_trait]
pub trait GetDataSource<T: Send + 'static>: Send + Sync {
    /// Fails with `NotFound` when nothing is stored for `query`.
    async fn get(&self, query: &Query) -> Result<T>;

    async fn get_all(&self, query: &Query) -> Result<Vec<T>>;
}

/// Write capability. Returns the value as stored, which may be normalized.
#[async_trait]
pub trait PutDataSource<T: Send + 'static>: Send + Sync {
    /// `None` means "no payload"; backends that need one fail with
    /// `InvalidArgument`.
    async fn put(&self, value: Option<T>, query: &Query) -> Result<T>;

    async fn put_all(&self, values: Option<Vec<T>>, query: &Query) -> Result<Vec<T>>;
}

/// Delete capability. Deleting an absent record is not an error.
#[async_trait]
pub trait DeleteDataSource: Send + Sync {
    async fn delete(&self, query: &Query) -> Result<()>;

    async fn delete_all(&self, query: &Query) -> Result<()>;
}

/// Full read/write/delete capability set.
pub trait DataSource<T: Send + 'static>:
    GetDataSource<T> + PutDataSource<T> + DeleteDataSource
{
}

impl<T, D> DataSource<T> for D
where
    T: Send + 'static,
    D: GetDataSource<T> + PutDataSource<T> + DeleteDataSource + ?Sized,
{
}

// =============================================================================
// SHARED INSTANCES
// =============================================================================

#[async_trait]
impl<T, D> GetDataSource<T> for Arc<D>
where
    T: Send + 'static,
    D: GetDataSource<T> + ?Sized,
{
    async fn get(&self, query: &Query) -> Result<T> {
        (**self).get(query).await
    }

    async fn get_all(&self, query: &Query) -> Result<Vec<T>> {
        (**self).get_all(query).await
    }
}

#[async_trait]
impl<T, D> PutDataSource<T> for Arc<D>
where
    T: Send + 'static,
    D: PutDataSource<T> + ?Sized,
{
    async fn put(&self, value: Option<T>, query: &Query) -> Result<T> {
        (**self).put(value, query).await
    }

    async fn put_all(&self, values: Option<Vec<T>>, query: &Query) -> Result<Vec<T>> {
        (**self).put_all(values, query).await
    }
}

#[async_trait]
impl<D> DeleteDataSource for Arc<D>
where
    D: DeleteDataSource + ?Sized,
{
    async fn delete(&self, query: &Query) -> Result<()> {
        (**self).delete(query).await
    }

    async fn delete_all(&self, query: &Query) -> Result<()> {
        (**self).delete_all(query).await
    }
}
