//! # Tierstore Scenario Runner
//!
//! Drives a [`CacheRepository`](tierstore_persistence::CacheRepository) of
//! books through writes, reads, a main-tier outage and deletes, logging what
//! each strategy does.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod book;
pub mod config;
pub mod scenario;
pub mod tiers;

pub use book::{Book, FreshnessValidator};
pub use config::Config;
pub use scenario::{Outcome, ScenarioOptions, ScenarioReport, Step};
pub use tiers::{BookRepository, Switchable, Tiers};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
