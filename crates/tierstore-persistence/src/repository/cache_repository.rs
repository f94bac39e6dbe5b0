//! Two-tier repository dispatching each call according to its [`Operation`].
//!
//! The main tier is authoritative; the cache tier is fast and possibly stale.
//! Only two failures are recovered locally:
//!
//! - a `CacheSync` read whose cache lookup fails with `NotFound`/`NotValid`
//!   falls through to a main read that refreshes the cache;
//! - a `Cache`/`CacheSync` read may serve the cached value anyway when the
//!   operation carries a fallback that accepts the terminal error.
//!
//! Every other error reaches the caller exactly as the tier reported it.
//! There is no per-key locking and no cross-tier transaction: a sync write
//! that fails on its second tier leaves the tiers disagreeing until the next
//! sync read repairs them.

use async_trait::async_trait;
use tierstore_domain::{ArrayValidator, ObjectValidator, Operation, Query, RepositoryError, Result};

use super::traits::{DeleteRepository, GetRepository, PutRepository};
use crate::data_source::{DeleteDataSource, GetDataSource, PutDataSource};

/// Repository composing a main data source, a cache data source and a
/// validator for cached values.
///
/// `M` and `C` only need the capabilities the called path uses: reads need
/// get on main and get+put on cache, writes need put on both, deletes need
/// delete on both.
#[derive(Debug, Clone)]
pub struct CacheRepository<M, C, V> {
    main: M,
    cache: C,
    validator: V,
}

impl<M, C, V> CacheRepository<M, C, V> {
    pub const fn new(main: M, cache: C, validator: V) -> Self {
        Self {
            main,
            cache,
            validator,
        }
    }

    pub const fn main(&self) -> &M {
        &self.main
    }

    pub const fn cache(&self) -> &C {
        &self.cache
    }

    pub const fn validator(&self) -> &V {
        &self.validator
    }

    fn unsupported(operation: &Operation) -> RepositoryError {
        tracing::warn!(%operation, "Operation not supported");
        RepositoryError::OperationNotSupported(operation.to_string())
    }
}

// =============================================================================
// READ PATH
// =============================================================================

impl<M, C, V> CacheRepository<M, C, V> {
    /// Cache read gated by the validator.
    async fn get_validated<T>(&self, query: &Query) -> Result<T>
    where
        T: Send + 'static,
        C: GetDataSource<T>,
        V: ObjectValidator<T>,
    {
        let value = self.cache.get(query).await?;
        if self.validator.is_valid(&value) {
            tracing::debug!(%query, "Cache hit");
            Ok(value)
        } else {
            Err(RepositoryError::NotValid)
        }
    }

    async fn get_all_validated<T>(&self, query: &Query) -> Result<Vec<T>>
    where
        T: Send + 'static,
        C: GetDataSource<T>,
        V: ObjectValidator<T>,
    {
        let values = self.cache.get_all(query).await?;
        if ArrayValidator::new(&self.validator).is_valid(&values) {
            tracing::debug!(%query, count = values.len(), "Cache hit");
            Ok(values)
        } else {
            Err(RepositoryError::NotValid)
        }
    }

    /// Main read, then refresh the cache with the result.
    async fn get_main_sync<T>(&self, query: &Query) -> Result<T>
    where
        T: Send + 'static,
        M: GetDataSource<T>,
        C: PutDataSource<T>,
    {
        let value = self.main.get(query).await?;
        self.cache.put(Some(value), query).await
    }

    async fn get_all_main_sync<T>(&self, query: &Query) -> Result<Vec<T>>
    where
        T: Send + 'static,
        M: GetDataSource<T>,
        C: PutDataSource<T>,
    {
        let values = self.main.get_all(query).await?;
        self.cache.put_all(Some(values), query).await
    }
}

#[async_trait]
impl<T, M, C, V> GetRepository<T> for CacheRepository<M, C, V>
where
    T: Send + 'static,
    M: GetDataSource<T>,
    C: GetDataSource<T> + PutDataSource<T>,
    V: ObjectValidator<T>,
{
    async fn get(&self, query: &Query, operation: &Operation) -> Result<T> {
        let operation = operation.for_read();
        tracing::debug!(%query, %operation, "get");

        match &operation {
            Operation::Main => self.main.get(query).await,
            Operation::Cache { .. } => match self.get_validated(query).await {
                Err(err @ RepositoryError::NotValid) if operation.accepts_stale(&err) => {
                    tracing::warn!(%query, "Serving cached value rejected by validator");
                    self.cache.get(query).await
                }
                result => result,
            },
            Operation::MainSync => self.get_main_sync(query).await,
            Operation::CacheSync { .. } => match self.get_validated(query).await {
                Err(err) if err.is_cache_miss() => {
                    tracing::debug!(%query, error = %err, "Cache miss, falling back to main");
                    match self.get_main_sync(query).await {
                        Err(final_err) if operation.accepts_stale(&final_err) => {
                            tracing::warn!(%query, error = %final_err, "Main read failed, serving cached value");
                            self.cache.get(query).await
                        }
                        result => result,
                    }
                }
                result => result,
            },
            Operation::Default | Operation::Custom(_) => Err(Self::unsupported(&operation)),
        }
    }

    async fn get_all(&self, query: &Query, operation: &Operation) -> Result<Vec<T>> {
        let operation = operation.for_read();
        tracing::debug!(%query, %operation, "get_all");

        match &operation {
            Operation::Main => self.main.get_all(query).await,
            Operation::Cache { .. } => match self.get_all_validated(query).await {
                Err(err @ RepositoryError::NotValid) if operation.accepts_stale(&err) => {
                    tracing::warn!(%query, "Serving cached values rejected by validator");
                    self.cache.get_all(query).await
                }
                result => result,
            },
            Operation::MainSync => self.get_all_main_sync(query).await,
            Operation::CacheSync { .. } => match self.get_all_validated(query).await {
                Err(err) if err.is_cache_miss() => {
                    tracing::debug!(%query, error = %err, "Cache miss, falling back to main");
                    match self.get_all_main_sync(query).await {
                        Err(final_err) if operation.accepts_stale(&final_err) => {
                            tracing::warn!(%query, error = %final_err, "Main read failed, serving cached values");
                            self.cache.get_all(query).await
                        }
                        result => result,
                    }
                }
                result => result,
            },
            Operation::Default | Operation::Custom(_) => Err(Self::unsupported(&operation)),
        }
    }
}

// =============================================================================
// WRITE PATH
// =============================================================================

#[async_trait]
impl<T, M, C, V> PutRepository<T> for CacheRepository<M, C, V>
where
    T: Send + 'static,
    M: PutDataSource<T>,
    C: PutDataSource<T>,
    V: Send + Sync,
{
    async fn put(&self, value: Option<T>, query: &Query, operation: &Operation) -> Result<T> {
        let operation = operation.for_write();
        tracing::debug!(%query, %operation, "put");

        match &operation {
            Operation::Main => self.main.put(value, query).await,
            Operation::Cache { .. } => self.cache.put(value, query).await,
            Operation::MainSync => {
                let stored = self.main.put(value, query).await?;
                self.cache.put(Some(stored), query).await
            }
            Operation::CacheSync { .. } => {
                let stored = self.cache.put(value, query).await?;
                self.main.put(Some(stored), query).await
            }
            Operation::Default | Operation::Custom(_) => Err(Self::unsupported(&operation)),
        }
    }

    async fn put_all(
        &self,
        values: Option<Vec<T>>,
        query: &Query,
        operation: &Operation,
    ) -> Result<Vec<T>> {
        let operation = operation.for_write();
        tracing::debug!(%query, %operation, "put_all");

        match &operation {
            Operation::Main => self.main.put_all(values, query).await,
            Operation::Cache { .. } => self.cache.put_all(values, query).await,
            Operation::MainSync => {
                let stored = self.main.put_all(values, query).await?;
                self.cache.put_all(Some(stored), query).await
            }
            Operation::CacheSync { .. } => {
                let stored = self.cache.put_all(values, query).await?;
                self.main.put_all(Some(stored), query).await
            }
            Operation::Default | Operation::Custom(_) => Err(Self::unsupported(&operation)),
        }
    }
}

// =============================================================================
// DELETE PATH
// =============================================================================

#[async_trait]
impl<M, C, V> DeleteRepository for CacheRepository<M, C, V>
where
    M: DeleteDataSource,
    C: DeleteDataSource,
    V: Send + Sync,
{
    async fn delete(&self, query: &Query, operation: &Operation) -> Result<()> {
        let operation = operation.for_write();
        tracing::debug!(%query, %operation, "delete");

        match &operation {
            Operation::Main => self.main.delete(query).await,
            Operation::Cache { .. } => self.cache.delete(query).await,
            Operation::MainSync => {
                self.main.delete(query).await?;
                self.cache.delete(query).await
            }
            Operation::CacheSync { .. } => {
                self.cache.delete(query).await?;
                self.main.delete(query).await
            }
            Operation::Default | Operation::Custom(_) => Err(Self::unsupported(&operation)),
        }
    }

    async fn delete_all(&self, query: &Query, operation: &Operation) -> Result<()> {
        let operation = operation.for_write();
        tracing::debug!(%query, %operation, "delete_all");

        match &operation {
            Operation::Main => self.main.delete_all(query).await,
            Operation::Cache { .. } => self.cache.delete_all(query).await,
            Operation::MainSync => {
                self.main.delete_all(query).await?;
                self.cache.delete_all(query).await
            }
            Operation::CacheSync { .. } => {
                self.cache.delete_all(query).await?;
                self.main.delete_all(query).await
            }
            Operation::Default | Operation::Custom(_) => Err(Self::unsupported(&operation)),
        }
    }
}
