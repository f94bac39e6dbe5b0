//! # Redis Data Source
//!
//! Redis-backed data source storing JSON-encoded values under namespaced keys.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};
use tierstore_domain::{Query, RepositoryError, Result};

use crate::data_source::{DeleteDataSource, GetDataSource, PutDataSource};

/// Redis data source configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    /// Prefix shared by every key this data source writes
    pub namespace: String,
    /// Expiry applied on every write; `None` keeps values until deleted
    pub ttl: Option<Duration>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            namespace: "tierstore".to_string(),
            ttl: None,
        }
    }
}

/// Key layout: single values under `{ns}:obj:{key}`, collections under
/// `{ns}:list:{key}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisKeys {
    namespace: String,
}

impl RedisKeys {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn object(&self, key: &str) -> String {
        format!("{}:obj:{key}", self.namespace)
    }

    #[must_use]
    pub fn list(&self, key: &str) -> String {
        format!("{}:list:{key}", self.namespace)
    }

    #[must_use]
    pub fn objects_pattern(&self) -> String {
        format!("{}:obj:*", self.namespace)
    }

    #[must_use]
    pub fn lists_pattern(&self) -> String {
        format!("{}:list:*", self.namespace)
    }

    #[must_use]
    pub fn all_pattern(&self) -> String {
        format!("{}:*", self.namespace)
    }
}

pub(crate) fn backend_error(err: redis::RedisError) -> RepositoryError {
    RepositoryError::Backend(format!("Redis error: {err}"))
}

/// Redis data source with a managed, auto-reconnecting connection.
///
/// Supports the same queries as
/// [`InMemoryDataSource`](crate::data_source::InMemoryDataSource).
pub struct RedisDataSource<T> {
    conn: ConnectionManager,
    keys: RedisKeys,
    ttl: Option<Duration>,
    _value: PhantomData<fn() -> T>,
}

impl<T> Clone for RedisDataSource<T> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            keys: self.keys.clone(),
            ttl: self.ttl,
            _value: PhantomData,
        }
    }
}

impl<T> RedisDataSource<T> {
    /// Connect to Redis.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the URL is invalid or the server is unreachable.
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str()).map_err(backend_error)?;
        let conn = ConnectionManager::new(client).await.map_err(backend_error)?;
        tracing::info!(url = %config.url, namespace = %config.namespace, "Connected to Redis");

        Ok(Self {
            conn,
            keys: RedisKeys::new(config.namespace),
            ttl: config.ttl,
            _value: PhantomData,
        })
    }

    pub const fn keys(&self) -> &RedisKeys {
        &self.keys
    }

    // =========================================================================
    // GENERIC OPERATIONS
    // =========================================================================

    async fn get_json<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await.map_err(backend_error)?;

        match value {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn set_json<V: Serialize + Sync>(&self, key: &str, value: &V) -> Result<()> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(value)?;
        match self.ttl {
            Some(ttl) => {
                let _: () = conn
                    .set_ex(key, json, ttl.as_secs().max(1))
                    .await
                    .map_err(backend_error)?;
            }
            None => {
                let _: () = conn.set(key, json).await.map_err(backend_error)?;
            }
        }
        Ok(())
    }

    async fn delete_keys(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        let deleted: i64 = conn.del(keys).await.map_err(backend_error)?;
        tracing::debug!(requested = keys.len(), deleted, "Deleted Redis keys");
        Ok(())
    }

    async fn matching_keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let mut keys: Vec<String> = conn.keys(pattern).await.map_err(backend_error)?;
        keys.sort();
        Ok(keys)
    }
}

#[async_trait]
impl<T> GetDataSource<T> for RedisDataSource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn get(&self, query: &Query) -> Result<T> {
        match query {
            Query::Key(key) => self
                .get_json(&self.keys.object(key))
                .await?
                .ok_or(RepositoryError::NotFound),
            _ => Err(RepositoryError::QueryNotSupported),
        }
    }

    async fn get_all(&self, query: &Query) -> Result<Vec<T>> {
        match query {
            Query::Key(key) => self
                .get_json(&self.keys.list(key))
                .await?
                .ok_or(RepositoryError::NotFound),
            Query::Ids(ids) => {
                let mut values = Vec::with_capacity(ids.len());
                for id in ids {
                    let value = self
                        .get_json(&self.keys.object(id))
                        .await?
                        .ok_or(RepositoryError::NotFound)?;
                    values.push(value);
                }
                Ok(values)
            }
            Query::All => {
                let mut values = Vec::new();
                for key in self.matching_keys(&self.keys.objects_pattern()).await? {
                    if let Some(value) = self.get_json(&key).await? {
                        values.push(value);
                    }
                }
                for key in self.matching_keys(&self.keys.lists_pattern()).await? {
                    if let Some(list) = self.get_json::<Vec<T>>(&key).await? {
                        values.extend(list);
                    }
                }
                Ok(values)
            }
            Query::Void => Err(RepositoryError::QueryNotSupported),
        }
    }
}

#[async_trait]
impl<T> PutDataSource<T> for RedisDataSource<T>
where
    T: Serialize + Send + Sync + 'static,
{
    async fn put(&self, value: Option<T>, query: &Query) -> Result<T> {
        let value = value.ok_or_else(|| {
            RepositoryError::InvalidArgument("RedisDataSource: value can't be empty".to_string())
        })?;

        match query {
            Query::Key(key) => {
                self.set_json(&self.keys.object(key), &value).await?;
                Ok(value)
            }
            _ => Err(RepositoryError::QueryNotSupported),
        }
    }

    async fn put_all(&self, values: Option<Vec<T>>, query: &Query) -> Result<Vec<T>> {
        let values = values.ok_or_else(|| {
            RepositoryError::InvalidArgument("RedisDataSource: values can't be empty".to_string())
        })?;

        match query {
            Query::Key(key) => {
                self.set_json(&self.keys.list(key), &values).await?;
                Ok(values)
            }
            Query::Ids(ids) => {
                if ids.len() != values.len() {
                    return Err(RepositoryError::InvalidArgument(format!(
                        "RedisDataSource: {} ids for {} values",
                        ids.len(),
                        values.len()
                    )));
                }
                for (id, value) in ids.iter().zip(&values) {
                    self.set_json(&self.keys.object(id), value).await?;
                }
                Ok(values)
            }
            _ => Err(RepositoryError::QueryNotSupported),
        }
    }
}

#[async_trait]
impl<T> DeleteDataSource for RedisDataSource<T> {
    async fn delete(&self, query: &Query) -> Result<()> {
        let keys = match query {
            Query::Key(key) => vec![self.keys.object(key), self.keys.list(key)],
            Query::Ids(ids) => ids
                .iter()
                .flat_map(|id| [self.keys.object(id), self.keys.list(id)])
                .collect(),
            Query::All => self.matching_keys(&self.keys.all_pattern()).await?,
            Query::Void => return Err(RepositoryError::QueryNotSupported),
        };
        self.delete_keys(&keys).await
    }

    async fn delete_all(&self, query: &Query) -> Result<()> {
        self.delete(query).await
    }
}
