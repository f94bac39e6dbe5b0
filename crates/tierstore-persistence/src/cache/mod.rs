//! # Cache Module
//!
//! Redis-backed data source, typically plugged in as the cache tier.

pub mod redis_client;

pub use redis_client::{RedisConfig, RedisDataSource, RedisKeys};
