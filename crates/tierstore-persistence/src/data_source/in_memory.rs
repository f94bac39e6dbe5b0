//! In-process data source backed by ordered maps.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tierstore_domain::{Query, RepositoryError, Result};
use tokio::sync::RwLock;

use super::{DeleteDataSource, GetDataSource, PutDataSource};

#[derive(Debug)]
struct Store<T> {
    objects: BTreeMap<String, T>,
    arrays: BTreeMap<String, Vec<T>>,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self {
            objects: BTreeMap::new(),
            arrays: BTreeMap::new(),
        }
    }
}

/// Key/value data source held in memory.
///
/// Single values and collections live in separate namespaces, so the same
/// key may address both an object (`put`) and an array (`put_all`).
///
/// | Query  | get | get_all | put | put_all | delete(_all) |
/// |--------|-----|---------|-----|---------|--------------|
/// | `Key`  | yes | yes     | yes | yes     | yes          |
/// | `Ids`  |     | yes     |     | yes     | yes          |
/// | `All`  |     | yes     |     |         | yes          |
#[derive(Debug)]
pub struct InMemoryDataSource<T> {
    store: RwLock<Store<T>>,
}

impl<T> InMemoryDataSource<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
        }
    }

    /// Number of single values currently stored.
    pub async fn len(&self) -> usize {
        self.store.read().await.objects.len()
    }

    pub async fn is_empty(&self) -> bool {
        let store = self.store.read().await;
        store.objects.is_empty() && store.arrays.is_empty()
    }
}

impl<T> Default for InMemoryDataSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> GetDataSource<T> for InMemoryDataSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn get(&self, query: &Query) -> Result<T> {
        match query {
            Query::Key(key) => self
                .store
                .read()
                .await
                .objects
                .get(key)
                .cloned()
                .ok_or(RepositoryError::NotFound),
            _ => Err(RepositoryError::QueryNotSupported),
        }
    }

    async fn get_all(&self, query: &Query) -> Result<Vec<T>> {
        let store = self.store.read().await;
        match query {
            Query::Key(key) => store.arrays.get(key).cloned().ok_or(RepositoryError::NotFound),
            Query::Ids(ids) => ids
                .iter()
                .map(|id| store.objects.get(id).cloned().ok_or(RepositoryError::NotFound))
                .collect(),
            Query::All => Ok(store
                .objects
                .values()
                .chain(store.arrays.values().flatten())
                .cloned()
                .collect()),
            Query::Void => Err(RepositoryError::QueryNotSupported),
        }
    }
}

#[async_trait]
impl<T> PutDataSource<T> for InMemoryDataSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn put(&self, value: Option<T>, query: &Query) -> Result<T> {
        let value = value.ok_or_else(|| {
            RepositoryError::InvalidArgument("InMemoryDataSource: value can't be empty".to_string())
        })?;

        match query {
            Query::Key(key) => {
                self.store
                    .write()
                    .await
                    .objects
                    .insert(key.clone(), value.clone());
                Ok(value)
            }
            _ => Err(RepositoryError::QueryNotSupported),
        }
    }

    async fn put_all(&self, values: Option<Vec<T>>, query: &Query) -> Result<Vec<T>> {
        let values = values.ok_or_else(|| {
            RepositoryError::InvalidArgument(
                "InMemoryDataSource: values can't be empty".to_string(),
            )
        })?;

        match query {
            Query::Key(key) => {
                self.store
                    .write()
                    .await
                    .arrays
                    .insert(key.clone(), values.clone());
                Ok(values)
            }
            Query::Ids(ids) => {
                if ids.len() != values.len() {
                    return Err(RepositoryError::InvalidArgument(format!(
                        "InMemoryDataSource: {} ids for {} values",
                        ids.len(),
                        values.len()
                    )));
                }
                let mut store = self.store.write().await;
                for (id, value) in ids.iter().zip(&values) {
                    store.objects.insert(id.clone(), value.clone());
                }
                Ok(values)
            }
            _ => Err(RepositoryError::QueryNotSupported),
        }
    }
}

#[async_trait]
impl<T> DeleteDataSource for InMemoryDataSource<T>
where
    T: Send + Sync,
{
    async fn delete(&self, query: &Query) -> Result<()> {
        let mut store = self.store.write().await;
        match query {
            Query::Key(key) => {
                store.objects.remove(key);
                store.arrays.remove(key);
            }
            Query::Ids(ids) => {
                for id in ids {
                    store.objects.remove(id);
                    store.arrays.remove(id);
                }
            }
            Query::All => {
                store.objects.clear();
                store.arrays.clear();
            }
            Query::Void => return Err(RepositoryError::QueryNotSupported),
        }
        Ok(())
    }

    async fn delete_all(&self, query: &Query) -> Result<()> {
        self.delete(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_put_then_get() {
        let source = InMemoryDataSource::new();
        let stored = source.put(Some(7), &Query::key("a")).await.unwrap();
        assert_eq!(stored, 7);
        assert_eq!(source.get(&Query::key("a")).await.unwrap(), 7);
        assert_eq!(source.len().await, 1);
    }

    #[tokio::test]
    async fn test_missing_key_is_not_found() {
        let source = InMemoryDataSource::<u32>::new();
        assert_eq!(
            source.get(&Query::key("missing")).await,
            Err(RepositoryError::NotFound)
        );
        assert_eq!(
            source.get_all(&Query::key("missing")).await,
            Err(RepositoryError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_unsupported_queries() {
        let source = InMemoryDataSource::<u32>::new();
        assert_eq!(source.get(&Query::All).await, Err(RepositoryError::QueryNotSupported));
        assert_eq!(
            source.put(Some(1), &Query::Void).await,
            Err(RepositoryError::QueryNotSupported)
        );
        assert_eq!(
            source.put_all(Some(vec![1]), &Query::All).await,
            Err(RepositoryError::QueryNotSupported)
        );
        assert_eq!(source.delete(&Query::Void).await, Err(RepositoryError::QueryNotSupported));
    }

    #[tokio::test]
    async fn test_put_requires_value() {
        let source = InMemoryDataSource::<u32>::new();
        let err = source.put(None, &Query::key("a")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidArgument(_)));
        assert!(source.is_empty().await);
    }

    #[tokio::test]
    async fn test_put_all_by_ids_and_get_all() {
        let source = InMemoryDataSource::new();
        source
            .put_all(Some(vec![1, 2, 3]), &Query::ids(["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(source.get(&Query::key("b")).await.unwrap(), 2);
        assert_eq!(
            source.get_all(&Query::ids(["c", "a"])).await.unwrap(),
            vec![3, 1]
        );
        assert_eq!(
            source.get_all(&Query::ids(["a", "zz"])).await,
            Err(RepositoryError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_put_all_ids_length_mismatch() {
        let source = InMemoryDataSource::new();
        let err = source
            .put_all(Some(vec![1]), &Query::ids(["a", "b"]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidArgument(_)));
        assert!(source.is_empty().await);
    }

    #[tokio::test]
    async fn test_objects_and_arrays_are_separate() {
        let source = InMemoryDataSource::new();
        source.put(Some(1), &Query::key("k")).await.unwrap();
        source.put_all(Some(vec![2, 3]), &Query::key("k")).await.unwrap();

        assert_eq!(source.get(&Query::key("k")).await.unwrap(), 1);
        assert_eq!(source.get_all(&Query::key("k")).await.unwrap(), vec![2, 3]);
        assert_eq!(source.get_all(&Query::All).await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_delete_variants() {
        let source = InMemoryDataSource::new();
        source
            .put_all(Some(vec![1, 2, 3]), &Query::ids(["a", "b", "c"]))
            .await
            .unwrap();

        assert_ok!(source.delete(&Query::key("missing")).await);
        assert_ok!(source.delete(&Query::key("a")).await);
        assert_err!(source.get(&Query::key("a")).await);
        assert_eq!(source.get(&Query::key("b")).await.unwrap(), 2);

        assert_ok!(source.delete_all(&Query::ids(["b"])).await);
        assert_eq!(source.len().await, 1);

        assert_ok!(source.delete_all(&Query::All).await);
        assert!(source.is_empty().await);
    }
}
