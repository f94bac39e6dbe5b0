//! Test doubles shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::{Dummy, Fake, Faker};
use tierstore_domain::{Query, RepositoryError, Result};

use crate::data_source::{DeleteDataSource, GetDataSource, InMemoryDataSource, PutDataSource};

#[derive(Debug, Clone, PartialEq, Eq, Dummy)]
pub struct Book {
    #[dummy(faker = "Sentence(1..4)")]
    pub title: String,
    #[dummy(faker = "Name()")]
    pub author: String,
    #[dummy(faker = "40..900")]
    pub pages: u32,
}

impl Book {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..random_book()
        }
    }
}

pub fn random_book() -> Book {
    Faker.fake()
}

/// Ordered log of `"{tier}.{method}"` entries shared by both tiers.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// In-memory data source that records every call and can be told to fail.
pub struct RecordingDataSource<T> {
    name: &'static str,
    inner: InMemoryDataSource<T>,
    log: CallLog,
    failures: Mutex<HashMap<&'static str, RepositoryError>>,
}

impl<T> RecordingDataSource<T> {
    pub fn new(name: &'static str, log: CallLog) -> Self {
        Self {
            name,
            inner: InMemoryDataSource::new(),
            log,
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Make every later call to `method` fail with `error`.
    pub fn fail(&self, method: &'static str, error: RepositoryError) {
        self.failures.lock().unwrap().insert(method, error);
    }

    pub fn recover(&self, method: &'static str) {
        self.failures.lock().unwrap().remove(method);
    }

    pub const fn inner(&self) -> &InMemoryDataSource<T> {
        &self.inner
    }

    fn record(&self, method: &'static str) -> Result<()> {
        self.log.lock().unwrap().push(format!("{}.{method}", self.name));
        match self.failures.lock().unwrap().get(method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> GetDataSource<T> for RecordingDataSource<T> {
    async fn get(&self, query: &Query) -> Result<T> {
        self.record("get")?;
        self.inner.get(query).await
    }

    async fn get_all(&self, query: &Query) -> Result<Vec<T>> {
        self.record("get_all")?;
        self.inner.get_all(query).await
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> PutDataSource<T> for RecordingDataSource<T> {
    async fn put(&self, value: Option<T>, query: &Query) -> Result<T> {
        self.record("put")?;
        self.inner.put(value, query).await
    }

    async fn put_all(&self, values: Option<Vec<T>>, query: &Query) -> Result<Vec<T>> {
        self.record("put_all")?;
        self.inner.put_all(values, query).await
    }
}

#[async_trait]
impl<T: Send + Sync> DeleteDataSource for RecordingDataSource<T> {
    async fn delete(&self, query: &Query) -> Result<()> {
        self.record("delete")?;
        self.inner.delete(query).await
    }

    async fn delete_all(&self, query: &Query) -> Result<()> {
        self.record("delete_all")?;
        self.inner.delete_all(query).await
    }
}
