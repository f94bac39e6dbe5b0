//! # Repository Module
//!
//! Repository traits and the two-tier [`CacheRepository`].

pub mod cache_repository;
pub mod traits;
pub mod void;

pub use cache_repository::CacheRepository;
pub use traits::{DeleteRepository, GetRepository, PutRepository, Repository};
pub use void::VoidRepository;
