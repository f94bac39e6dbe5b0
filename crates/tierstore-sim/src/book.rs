//! Sample entity stored by the scenarios.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tierstore_domain::ObjectValidator;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            updated_at: Utc::now(),
        }
    }

    /// Same book, last updated at `updated_at`.
    #[must_use]
    pub fn touched_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }
}

/// Rejects books whose last update is older than `max_age`.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessValidator {
    max_age: Duration,
}

impl FreshnessValidator {
    pub const fn new(max_age: Duration) -> Self {
        Self { max_age }
    }
}

impl ObjectValidator<Book> for FreshnessValidator {
    fn is_valid(&self, book: &Book) -> bool {
        // Timestamps in the future count as fresh
        Utc::now()
            .signed_duration_since(book.updated_at)
            .to_std()
            .map_or(true, |age| age <= self.max_age)
    }
}
