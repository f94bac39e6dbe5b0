//! Tier wiring for the scenario runner.
//!
//! The main tier keeps books as raw JSON records behind a mapper; the cache
//! tier is Redis when configured, in-memory otherwise.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tierstore_domain::{Query, RepositoryError, Result, TryClosureMapper};
use tierstore_persistence::{
    CacheRepository, DataSource, DataSourceMapper, DeleteDataSource, GetDataSource,
    InMemoryDataSource, PutDataSource,
};

use crate::book::{Book, FreshnessValidator};
use crate::config::Config;

pub type BookRepository =
    CacheRepository<Arc<dyn DataSource<Book>>, Arc<dyn DataSource<Book>>, FreshnessValidator>;

/// Data source wrapper that can be switched offline to simulate an outage.
pub struct Switchable<D> {
    name: &'static str,
    inner: D,
    online: AtomicBool,
}

impl<D> Switchable<D> {
    pub const fn new(name: &'static str, inner: D) -> Self {
        Self {
            name,
            inner,
            online: AtomicBool::new(true),
        }
    }

    pub fn set_online(&self, online: bool) {
        tracing::info!(tier = self.name, online, "Tier availability changed");
        self.online.store(online, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RepositoryError::Backend(format!("{} tier offline", self.name)))
        }
    }
}

#[async_trait]
impl<T, D> GetDataSource<T> for Switchable<D>
where
    T: Send + 'static,
    D: GetDataSource<T>,
{
    async fn get(&self, query: &Query) -> Result<T> {
        self.check()?;
        self.inner.get(query).await
    }

    async fn get_all(&self, query: &Query) -> Result<Vec<T>> {
        self.check()?;
        self.inner.get_all(query).await
    }
}

#[async_trait]
impl<T, D> PutDataSource<T> for Switchable<D>
where
    T: Send + 'static,
    D: PutDataSource<T>,
{
    async fn put(&self, value: Option<T>, query: &Query) -> Result<T> {
        self.check()?;
        self.inner.put(value, query).await
    }

    async fn put_all(&self, values: Option<Vec<T>>, query: &Query) -> Result<Vec<T>> {
        self.check()?;
        self.inner.put_all(values, query).await
    }
}

#[async_trait]
impl<D: DeleteDataSource> DeleteDataSource for Switchable<D> {
    async fn delete(&self, query: &Query) -> Result<()> {
        self.check()?;
        self.inner.delete(query).await
    }

    async fn delete_all(&self, query: &Query) -> Result<()> {
        self.check()?;
        self.inner.delete_all(query).await
    }
}

pub type Records = Arc<Switchable<InMemoryDataSource<Value>>>;

/// Repository plus a handle on the main tier's availability switch.
pub struct Tiers {
    pub repository: BookRepository,
    pub main: Records,
}

fn book_from_record(record: Value) -> serde_json::Result<Book> {
    serde_json::from_value(record)
}

fn record_from_book(book: Book) -> serde_json::Result<Value> {
    serde_json::to_value(book)
}

fn main_tier(records: Records) -> Arc<dyn DataSource<Book>> {
    let to_book: fn(Value) -> serde_json::Result<Book> = book_from_record;
    let to_record: fn(Book) -> serde_json::Result<Value> = record_from_book;

    Arc::new(DataSourceMapper::<_, _, _, _, _, Value>::single(
        records,
        TryClosureMapper::new(to_book),
        TryClosureMapper::new(to_record),
    ))
}

/// Both tiers in memory.
pub fn in_memory(config: &Config) -> Tiers {
    let cache: Arc<dyn DataSource<Book>> = Arc::new(InMemoryDataSource::<Book>::new());
    assemble(config, cache)
}

/// Tiers as configured: Redis cache when `REDIS_URL` is set.
///
/// # Errors
///
/// Returns an error if the Redis cache tier cannot be reached.
pub async fn from_config(config: &Config) -> anyhow::Result<Tiers> {
    match &config.redis_url {
        #[cfg(feature = "redis")]
        Some(url) => {
            use tierstore_persistence::{RedisConfig, RedisDataSource};

            let redis = RedisDataSource::<Book>::new(RedisConfig {
                url: url.clone(),
                namespace: config.cache_namespace.clone(),
                ttl: config.cache_ttl,
            })
            .await?;
            Ok(assemble(config, Arc::new(redis)))
        }
        #[cfg(not(feature = "redis"))]
        Some(_) => anyhow::bail!("REDIS_URL is set but the redis feature is disabled"),
        None => Ok(in_memory(config)),
    }
}

fn assemble(config: &Config, cache: Arc<dyn DataSource<Book>>) -> Tiers {
    let main: Records = Arc::new(Switchable::new("main", InMemoryDataSource::new()));
    let repository = CacheRepository::new(
        main_tier(main.clone()),
        cache,
        FreshnessValidator::new(config.max_age),
    );
    Tiers { repository, main }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_switchable_offline() {
        let source = Switchable::new("main", InMemoryDataSource::<u32>::new());
        assert_ok!(source.put(Some(1), &Query::key("a")).await);

        source.set_online(false);
        let err = source.get(&Query::key("a")).await.unwrap_err();
        assert_eq!(err, RepositoryError::Backend("main tier offline".to_string()));

        assert_err!(source.delete(&Query::key("a")).await);

        source.set_online(true);
        assert_eq!(source.get(&Query::key("a")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_main_tier_stores_json_records() {
        let records: Records = Arc::new(Switchable::new("main", InMemoryDataSource::new()));
        let main = main_tier(records.clone());
        let book = Book::new("X");

        main.put(Some(book.clone()), &Query::key("b1")).await.unwrap();
        let record: Value = records.get(&Query::key("b1")).await.unwrap();
        assert_eq!(record["title"], "X");
        assert_eq!(main.get(&Query::key("b1")).await.unwrap(), book);
    }
}
