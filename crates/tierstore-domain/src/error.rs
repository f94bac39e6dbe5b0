//! Repository error taxonomy shared by data sources and repositories.

use std::fmt;

use thiserror::Error;

/// Errors surfaced by data sources and by the orchestrating repository.
///
/// The repository never wraps or reclassifies an error coming from a tier:
/// whatever a data source returns reaches the caller with the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("No value found for the given query")]
    NotFound,

    #[error("Cached value rejected by validator")]
    NotValid,

    #[error("Query not supported by data source")]
    QueryNotSupported,

    #[error("Operation not supported: {0}")]
    OperationNotSupported(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Method not implemented")]
    MethodNotImplemented,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Mapping error: {0}")]
    Mapping(String),
}

impl RepositoryError {
    /// Kind of this error, without its payload.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::NotValid => ErrorKind::NotValid,
            Self::QueryNotSupported => ErrorKind::QueryNotSupported,
            Self::OperationNotSupported(_) => ErrorKind::OperationNotSupported,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::MethodNotImplemented => ErrorKind::MethodNotImplemented,
            Self::Backend(_) => ErrorKind::Backend,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Mapping(_) => ErrorKind::Mapping,
        }
    }

    /// True for the two read failures a cache-first read may recover from.
    #[must_use]
    pub const fn is_cache_miss(&self) -> bool {
        matches!(self, Self::NotFound | Self::NotValid)
    }
}

/// Payload-free discriminant of [`RepositoryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    NotValid,
    QueryNotSupported,
    OperationNotSupported,
    InvalidArgument,
    MethodNotImplemented,
    Backend,
    Serialization,
    Mapping,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "NOT_FOUND",
            Self::NotValid => "NOT_VALID",
            Self::QueryNotSupported => "QUERY_NOT_SUPPORTED",
            Self::OperationNotSupported => "OPERATION_NOT_SUPPORTED",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::MethodNotImplemented => "METHOD_NOT_IMPLEMENTED",
            Self::Backend => "BACKEND",
            Self::Serialization => "SERIALIZATION",
            Self::Mapping => "MAPPING",
        };
        f.write_str(name)
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
