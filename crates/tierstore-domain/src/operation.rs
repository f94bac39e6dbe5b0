//! Strategy selectors deciding how a call traverses the main and cache tiers.
//!
//! | Operation   | get                               | put / delete          |
//! |-------------|-----------------------------------|-----------------------|
//! | `Default`   | same as `CacheSync`               | same as `MainSync`    |
//! | `Main`      | main only                         | main only             |
//! | `Cache`     | cache only, validated             | cache only            |
//! | `MainSync`  | main, then refresh cache          | main, then cache      |
//! | `CacheSync` | cache, repair from main on miss   | cache, then main      |
//! | `Custom`    | rejected                          | rejected              |

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::RepositoryError;

/// Caller-supplied predicate deciding whether a stale cached value may be
/// served instead of failing with the given terminal error.
///
/// Invoked synchronously, at most once per call. It must not block.
#[derive(Clone)]
pub struct Fallback(Arc<dyn Fn(&RepositoryError) -> bool + Send + Sync>);

impl Fallback {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&RepositoryError) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    /// Accept a stale value for any error.
    #[must_use]
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Never accept a stale value.
    #[must_use]
    pub fn never() -> Self {
        Self::new(|_| false)
    }

    #[must_use]
    pub fn accept(&self, error: &RepositoryError) -> bool {
        (self.0)(error)
    }
}

impl fmt::Debug for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Fallback(..)")
    }
}

/// Synchronization strategy for a single repository call.
#[derive(Debug, Clone, Default)]
pub enum Operation {
    /// Rewritten to `CacheSync` for reads and to `MainSync` for writes and deletes
    #[default]
    Default,
    /// Main tier only
    Main,
    /// Cache tier only
    Cache { fallback: Option<Fallback> },
    /// Main tier first, then reflected into the cache
    MainSync,
    /// Cache tier first, then main
    CacheSync { fallback: Option<Fallback> },
    /// Caller-defined strategy; never dispatched
    Custom(String),
}

impl Operation {
    #[must_use]
    pub const fn cache() -> Self {
        Self::Cache { fallback: None }
    }

    #[must_use]
    pub const fn cache_sync() -> Self {
        Self::CacheSync { fallback: None }
    }

    /// Cache-only read that may serve a value the validator rejected.
    pub fn cache_with_fallback<F>(predicate: F) -> Self
    where
        F: Fn(&RepositoryError) -> bool + Send + Sync + 'static,
    {
        Self::Cache {
            fallback: Some(Fallback::new(predicate)),
        }
    }

    /// Read-through that may serve the cached value once main also failed.
    pub fn cache_sync_with_fallback<F>(predicate: F) -> Self
    where
        F: Fn(&RepositoryError) -> bool + Send + Sync + 'static,
    {
        Self::CacheSync {
            fallback: Some(Fallback::new(predicate)),
        }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Attach `fallback` to a `Cache` or `CacheSync` operation. Other
    /// variants carry no fallback and are returned unchanged.
    #[must_use]
    pub fn with_fallback(self, fallback: Fallback) -> Self {
        match self {
            Self::Cache { .. } => Self::Cache {
                fallback: Some(fallback),
            },
            Self::CacheSync { .. } => Self::CacheSync {
                fallback: Some(fallback),
            },
            other => other,
        }
    }

    /// Concrete operation used on the read path.
    #[must_use]
    pub fn for_read(&self) -> Self {
        match self {
            Self::Default => Self::cache_sync(),
            other => other.clone(),
        }
    }

    /// Concrete operation used on the write and delete paths.
    #[must_use]
    pub fn for_write(&self) -> Self {
        match self {
            Self::Default => Self::MainSync,
            other => other.clone(),
        }
    }

    #[must_use]
    pub const fn fallback(&self) -> Option<&Fallback> {
        match self {
            Self::Cache { fallback } | Self::CacheSync { fallback } => fallback.as_ref(),
            _ => None,
        }
    }

    /// Whether the fallback predicate exists and accepts `error`.
    #[must_use]
    pub fn accepts_stale(&self, error: &RepositoryError) -> bool {
        self.fallback().is_some_and(|fallback| fallback.accept(error))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Default => "default",
            Self::Main => "main",
            Self::Cache { .. } => "cache",
            Self::MainSync => "main_sync",
            Self::CacheSync { .. } => "cache_sync",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = Infallible;

    /// Unknown names parse into [`Operation::Custom`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "default" => Self::Default,
            "main" => Self::Main,
            "cache" => Self::cache(),
            "main_sync" => Self::MainSync,
            "cache_sync" => Self::cache_sync(),
            _ => Self::Custom(s.to_string()),
        })
    }
}
