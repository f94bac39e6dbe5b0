//! # Tierstore Persistence
//!
//! Two-tier data access: a fast, possibly-stale cache tier in front of an
//! authoritative main tier, unified behind one query-and-strategy API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Application Layer                        │
//! │              (Query + Operation per call)                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CacheRepository                         │
//! │       (dispatch, validation, fallthrough, fallback)          │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │   Cache data source     │   │      Main data source        │
//! │  (Redis, in-memory)     │   │   (source of truth)          │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - `redis`: Enable the Redis data source (default)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tierstore_persistence::{
//!     CacheRepository, DefaultObjectValidator, GetRepository, InMemoryDataSource,
//!     Operation, PutRepository, Query,
//! };
//!
//! let repo = CacheRepository::new(
//!     Arc::new(InMemoryDataSource::new()),
//!     Arc::new(InMemoryDataSource::new()),
//!     DefaultObjectValidator,
//! );
//!
//! repo.put(Some(book), &Query::key("b1"), &Operation::Default).await?;
//! let book = repo.get(&Query::key("b1"), &Operation::Default).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

#[cfg(feature = "redis")]
pub mod cache;
pub mod data_source;
pub mod repository;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(feature = "redis")]
pub use cache::{RedisConfig, RedisDataSource};
pub use data_source::{
    DataSource, DataSourceMapper, DeleteDataSource, GetDataSource, InMemoryDataSource,
    PutDataSource, VoidDataSource,
};
pub use repository::{
    CacheRepository, DeleteRepository, GetRepository, PutRepository, Repository, VoidRepository,
};

// Re-export the value types every caller needs alongside the repository
pub use tierstore_domain::{
    ArrayValidator, DefaultObjectValidator, ErrorKind, Fallback, Mapper, ObjectValidator,
    Operation, Query, RepositoryError, Result,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
