//! # Tierstore Domain
//!
//! Value types shared by every layer of the two-tier repository:
//!
//! - [`Query`]: which record(s) a call targets
//! - [`Operation`]: how a call traverses the main and cache tiers
//! - [`ObjectValidator`]: whether a cached value may still be served
//! - [`Mapper`]: translation between backend and domain representations
//! - [`RepositoryError`]: the error taxonomy every tier reports with
//!
//! Nothing in this crate performs I/O.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod mapper;
pub mod operation;
pub mod query;
pub mod validator;

pub use error::{ErrorKind, RepositoryError, Result};
pub use mapper::{ClosureMapper, IntoMapper, Mapper, TryClosureMapper};
pub use operation::{Fallback, Operation};
pub use query::Query;
pub use validator::{
    ArrayValidator, Collection, DefaultObjectValidator, FnValidator, ObjectValidator,
};
