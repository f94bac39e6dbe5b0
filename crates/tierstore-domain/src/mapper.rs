//! Value translation between a backend representation and a domain type.

use crate::error::{RepositoryError, Result};

/// One-way translation from `In` into `Out`.
pub trait Mapper<In, Out>: Send + Sync {
    /// # Errors
    ///
    /// Returns [`RepositoryError::Mapping`] when `from` has no `Out` form.
    fn map(&self, from: In) -> Result<Out>;

    /// Translate every element, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Propagates the first element's mapping error.
    fn map_all(&self, from: Vec<In>) -> Result<Vec<Out>> {
        from.into_iter().map(|value| self.map(value)).collect()
    }
}

/// Mapper backed by an infallible closure.
pub struct ClosureMapper<F>(F);

impl<F> ClosureMapper<F> {
    pub const fn new(map: F) -> Self {
        Self(map)
    }
}

impl<In, Out, F> Mapper<In, Out> for ClosureMapper<F>
where
    F: Fn(In) -> Out + Send + Sync,
{
    fn map(&self, from: In) -> Result<Out> {
        Ok((self.0)(from))
    }
}

/// Mapper backed by a fallible conversion.
pub struct TryClosureMapper<F>(F);

impl<F> TryClosureMapper<F> {
    pub const fn new(map: F) -> Self {
        Self(map)
    }
}

impl<In, Out, E, F> Mapper<In, Out> for TryClosureMapper<F>
where
    F: Fn(In) -> std::result::Result<Out, E> + Send + Sync,
    E: std::fmt::Display,
{
    fn map(&self, from: In) -> Result<Out> {
        (self.0)(from).map_err(|e| RepositoryError::Mapping(e.to_string()))
    }
}

/// Mapper converting through the standard `Into` impl.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntoMapper;

impl<In, Out> Mapper<In, Out> for IntoMapper
where
    In: Into<Out>,
{
    fn map(&self, from: In) -> Result<Out> {
        Ok(from.into())
    }
}
