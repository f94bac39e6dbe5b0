//! Data source adapter translating between a backend type and a domain type.

use std::marker::PhantomData;

use async_trait::async_trait;
use tierstore_domain::{Mapper, Query, Result};

use super::{DeleteDataSource, GetDataSource, PutDataSource};

/// Presents data sources over `In` as a data source over `Out`.
///
/// Reads are mapped `In -> Out` after the inner call; writes are mapped
/// `Out -> In` before it and the stored result is mapped back. Deletes pass
/// straight through.
pub struct DataSourceMapper<G, P, D, ToOut, ToIn, In> {
    get: G,
    put: P,
    delete: D,
    to_out: ToOut,
    to_in: ToIn,
    _backend: PhantomData<fn() -> In>,
}

impl<G, P, D, ToOut, ToIn, In> DataSourceMapper<G, P, D, ToOut, ToIn, In> {
    pub const fn new(get: G, put: P, delete: D, to_out: ToOut, to_in: ToIn) -> Self {
        Self {
            get,
            put,
            delete,
            to_out,
            to_in,
            _backend: PhantomData,
        }
    }
}

impl<S, ToOut, ToIn, In> DataSourceMapper<S, S, S, ToOut, ToIn, In>
where
    S: Clone,
{
    /// Adapter over one backend serving all three capabilities.
    pub fn single(source: S, to_out: ToOut, to_in: ToIn) -> Self {
        Self::new(source.clone(), source.clone(), source, to_out, to_in)
    }
}

#[async_trait]
impl<G, P, D, ToOut, ToIn, In, Out> GetDataSource<Out> for DataSourceMapper<G, P, D, ToOut, ToIn, In>
where
    In: Send + 'static,
    Out: Send + 'static,
    G: GetDataSource<In>,
    P: Send + Sync,
    D: Send + Sync,
    ToOut: Mapper<In, Out>,
    ToIn: Send + Sync,
{
    async fn get(&self, query: &Query) -> Result<Out> {
        let value = self.get.get(query).await?;
        self.to_out.map(value)
    }

    async fn get_all(&self, query: &Query) -> Result<Vec<Out>> {
        let values = self.get.get_all(query).await?;
        self.to_out.map_all(values)
    }
}

#[async_trait]
impl<G, P, D, ToOut, ToIn, In, Out> PutDataSource<Out> for DataSourceMapper<G, P, D, ToOut, ToIn, In>
where
    In: Send + 'static,
    Out: Send + 'static,
    G: Send + Sync,
    P: PutDataSource<In>,
    D: Send + Sync,
    ToOut: Mapper<In, Out>,
    ToIn: Mapper<Out, In>,
{
    async fn put(&self, value: Option<Out>, query: &Query) -> Result<Out> {
        let mapped = value.map(|v| self.to_in.map(v)).transpose()?;
        let stored = self.put.put(mapped, query).await?;
        self.to_out.map(stored)
    }

    async fn put_all(&self, values: Option<Vec<Out>>, query: &Query) -> Result<Vec<Out>> {
        let mapped = values.map(|v| self.to_in.map_all(v)).transpose()?;
        let stored = self.put.put_all(mapped, query).await?;
        self.to_out.map_all(stored)
    }
}

#[async_trait]
impl<G, P, D, ToOut, ToIn, In> DeleteDataSource for DataSourceMapper<G, P, D, ToOut, ToIn, In>
where
    G: Send + Sync,
    P: Send + Sync,
    D: DeleteDataSource,
    ToOut: Send + Sync,
    ToIn: Send + Sync,
{
    async fn delete(&self, query: &Query) -> Result<()> {
        self.delete.delete(query).await
    }

    async fn delete_all(&self, query: &Query) -> Result<()> {
        self.delete.delete_all(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::InMemoryDataSource;
    use std::sync::Arc;
    use tierstore_domain::{ClosureMapper, RepositoryError, TryClosureMapper};

    #[derive(Debug, Clone, PartialEq)]
    struct Celsius(i32);

    fn adapter(
        backend: Arc<InMemoryDataSource<String>>,
    ) -> impl GetDataSource<Celsius> + PutDataSource<Celsius> + DeleteDataSource {
        DataSourceMapper::<_, _, _, _, _, String>::single(
            backend,
            TryClosureMapper::new(|s: String| s.parse::<i32>().map(Celsius)),
            ClosureMapper::new(|c: Celsius| c.0.to_string()),
        )
    }

    #[tokio::test]
    async fn test_writes_are_stored_in_backend_form() {
        let backend = Arc::new(InMemoryDataSource::<String>::new());
        let source = adapter(backend.clone());

        let stored = source.put(Some(Celsius(21)), &Query::key("t")).await.unwrap();
        assert_eq!(stored, Celsius(21));
        assert_eq!(backend.get(&Query::key("t")).await.unwrap(), "21");
        assert_eq!(source.get(&Query::key("t")).await.unwrap(), Celsius(21));
    }

    #[tokio::test]
    async fn test_batch_mapping() {
        let backend = Arc::new(InMemoryDataSource::<String>::new());
        let source = adapter(backend.clone());

        source
            .put_all(Some(vec![Celsius(1), Celsius(2)]), &Query::ids(["a", "b"]))
            .await
            .unwrap();
        assert_eq!(
            source.get_all(&Query::ids(["b", "a"])).await.unwrap(),
            vec![Celsius(2), Celsius(1)]
        );
    }

    #[tokio::test]
    async fn test_backend_errors_pass_through() {
        let backend = Arc::new(InMemoryDataSource::<String>::new());
        let source = adapter(backend);

        assert_eq!(source.get(&Query::key("none")).await, Err(RepositoryError::NotFound));
        let err = source.put(None, &Query::key("t")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_unmappable_backend_value() {
        let backend = Arc::new(InMemoryDataSource::<String>::new());
        backend
            .put(Some("warm".to_string()), &Query::key("t"))
            .await
            .unwrap();
        let source = adapter(backend.clone());

        let err = source.get(&Query::key("t")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Mapping(_)));

        source.delete(&Query::key("t")).await.unwrap();
        assert!(backend.is_empty().await);
    }
}
