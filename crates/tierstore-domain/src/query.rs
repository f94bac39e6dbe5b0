//! Addressing values describing which record(s) a call targets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lookup descriptor passed to every data source and repository call.
///
/// Data sources decide which variants they understand; anything else is
/// answered with [`RepositoryError::QueryNotSupported`](crate::RepositoryError::QueryNotSupported).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Query {
    /// A single record under one key
    Key(String),
    /// A set of records, one per id
    Ids(Vec<String>),
    /// Every record held by the data source
    All,
    /// No addressing; the backend decides or rejects
    #[default]
    Void,
}

impl Query {
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ids(ids.into_iter().map(Into::into).collect())
    }

    /// Key carried by a [`Query::Key`], if any.
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "key:{key}"),
            Self::Ids(ids) => write!(f, "ids:[{}]", ids.join(",")),
            Self::All => f.write_str("all"),
            Self::Void => f.write_str("void"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(Query::key("b1"), Query::Key("b1".to_string()));
        assert_eq!(
            Query::ids(["a", "b"]),
            Query::Ids(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(Query::default(), Query::Void);
    }

    #[test]
    fn test_display() {
        assert_eq!(Query::key("b1").to_string(), "key:b1");
        assert_eq!(Query::ids(["a", "b"]).to_string(), "ids:[a,b]");
        assert_eq!(Query::All.to_string(), "all");
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&Query::key("b1")).unwrap();
        assert_eq!(json, r#"{"type":"KEY","value":"b1"}"#);
        let back: Query = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_key(), Some("b1"));
    }
}
