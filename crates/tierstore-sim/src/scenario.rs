//! Scripted walk through the read, write and delete strategies.

use std::time::Duration;

use chrono::Utc;
use tierstore_domain::{ErrorKind, Fallback, Operation, Query, RepositoryError};
use tierstore_persistence::{DeleteRepository, GetRepository, PutRepository};

use crate::book::Book;
use crate::tiers::Tiers;

/// What to run and with which strategies.
#[derive(Debug, Clone)]
pub struct ScenarioOptions {
    pub key: String,
    /// Titles written one after another under `key`
    pub titles: Vec<String>,
    pub read_op: Operation,
    pub write_op: Operation,
    /// Serve the stale cached book while the main tier is offline
    pub accept_stale: bool,
    /// Delete the key at the end
    pub delete: bool,
    /// How far past the freshness window the outage book is dated
    pub staleness: Duration,
}

impl Default for ScenarioOptions {
    fn default() -> Self {
        Self {
            key: "b1".to_string(),
            titles: vec!["X".to_string(), "Y".to_string()],
            read_op: Operation::Default,
            write_op: Operation::Default,
            accept_stale: true,
            delete: true,
            staleness: Duration::from_secs(3600),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Book(Book),
    Deleted,
    Failed(RepositoryError),
}

impl Outcome {
    #[must_use]
    pub const fn book(&self) -> Option<&Book> {
        match self {
            Self::Book(book) => Some(book),
            _ => None,
        }
    }

    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Failed(err) => Some(err.kind()),
            _ => None,
        }
    }
}

impl From<Result<Book, RepositoryError>> for Outcome {
    fn from(result: Result<Book, RepositoryError>) -> Self {
        result.map_or_else(Self::Failed, Self::Book)
    }
}

#[derive(Debug, Clone)]
pub struct Step {
    pub action: &'static str,
    pub operation: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioReport {
    pub steps: Vec<Step>,
}

impl ScenarioReport {
    fn record(&mut self, action: &'static str, operation: &Operation, outcome: Outcome) {
        match &outcome {
            Outcome::Book(book) => {
                tracing::info!(action, %operation, title = %book.title, "Step succeeded");
            }
            Outcome::Deleted => tracing::info!(action, %operation, "Step succeeded"),
            Outcome::Failed(err) => {
                tracing::warn!(action, %operation, error = %err, "Step failed");
            }
        }
        self.steps.push(Step {
            action,
            operation: operation.to_string(),
            outcome,
        });
    }

    /// Steps with the given action, in execution order.
    pub fn steps_for<'a>(&'a self, action: &'a str) -> impl Iterator<Item = &'a Step> + 'a {
        self.steps.iter().filter(move |step| step.action == action)
    }

    #[must_use]
    pub fn failures(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step.outcome, Outcome::Failed(_)))
            .count()
    }
}

/// Run the scenario against `tiers`.
///
/// Repository errors are recorded in the report rather than returned.
pub async fn run(tiers: &Tiers, options: &ScenarioOptions, max_age: Duration) -> ScenarioReport {
    let mut report = ScenarioReport::default();
    let query = Query::key(options.key.clone());

    // Overwrite and read back
    for title in &options.titles {
        let stored = tiers
            .repository
            .put(Some(Book::new(title.clone())), &query, &options.write_op)
            .await;
        report.record("put", &options.write_op, stored.into());

        let read = GetRepository::<Book>::get(&tiers.repository, &query, &options.read_op).await;
        report.record("get", &options.read_op, read.into());
    }

    // Stale cache while the main tier is down
    let aged = chrono::Duration::from_std(max_age + options.staleness)
        .map_or(Utc::now(), |age| Utc::now() - age);
    let stale = Book::new("stale").touched_at(aged);
    let stored = tiers
        .repository
        .put(Some(stale), &query, &Operation::Default)
        .await;
    report.record("seed_stale", &Operation::Default, stored.into());

    let fallback = if options.accept_stale {
        Fallback::new(|err| matches!(err, RepositoryError::Backend(_)))
    } else {
        Fallback::never()
    };
    let outage_op = Operation::cache_sync().with_fallback(fallback);

    tiers.main.set_online(false);
    let read = GetRepository::<Book>::get(&tiers.repository, &query, &outage_op).await;
    tiers.main.set_online(true);
    report.record("get_during_outage", &outage_op, read.into());

    if options.delete {
        let deleted = DeleteRepository::delete(&tiers.repository, &query, &options.write_op).await;
        let outcome = deleted.map_or_else(Outcome::Failed, |()| Outcome::Deleted);
        report.record("delete", &options.write_op, outcome);

        let read = GetRepository::<Book>::get(&tiers.repository, &query, &options.read_op).await;
        report.record("get_after_delete", &options.read_op, read.into());
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::tiers;

    const MAX_AGE: Duration = Duration::from_secs(300);

    fn in_memory() -> Tiers {
        let config = Config {
            max_age: MAX_AGE,
            ..Config::default()
        };
        tiers::in_memory(&config)
    }

    fn titles(report: &ScenarioReport, action: &str) -> Vec<String> {
        report
            .steps_for(action)
            .filter_map(|step| step.outcome.book())
            .map(|book| book.title.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_default_scenario() {
        let tiers = in_memory();
        let report = run(&tiers, &ScenarioOptions::default(), MAX_AGE).await;

        assert_eq!(titles(&report, "put"), vec!["X", "Y"]);
        assert_eq!(titles(&report, "get"), vec!["X", "Y"]);
        assert_eq!(titles(&report, "get_during_outage"), vec!["stale"]);

        let last = report.steps.last().unwrap();
        assert_eq!(last.action, "get_after_delete");
        assert_eq!(last.outcome.error_kind(), Some(ErrorKind::NotFound));
        assert_eq!(report.failures(), 1);
    }

    #[tokio::test]
    async fn test_outage_without_fallback_fails() {
        let tiers = in_memory();
        let options = ScenarioOptions {
            accept_stale: false,
            delete: false,
            ..ScenarioOptions::default()
        };
        let report = run(&tiers, &options, MAX_AGE).await;

        let outage = report.steps_for("get_during_outage").next().unwrap();
        assert_eq!(
            outage.outcome,
            Outcome::Failed(RepositoryError::Backend("main tier offline".to_string()))
        );
        assert_eq!(outage.operation, "cache_sync");
        assert!(report.steps_for("delete").next().is_none());
    }

    #[tokio::test]
    async fn test_cache_only_writes_are_invisible_to_main_reads() {
        let tiers = in_memory();
        let options = ScenarioOptions {
            titles: vec!["X".to_string()],
            read_op: Operation::Main,
            write_op: Operation::cache(),
            delete: false,
            ..ScenarioOptions::default()
        };
        let report = run(&tiers, &options, MAX_AGE).await;

        let read = report.steps_for("get").next().unwrap();
        assert_eq!(read.outcome.error_kind(), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_custom_operation_is_rejected() {
        let tiers = in_memory();
        let options = ScenarioOptions {
            titles: vec!["X".to_string()],
            write_op: Operation::custom("write_behind"),
            delete: false,
            ..ScenarioOptions::default()
        };
        let report = run(&tiers, &options, MAX_AGE).await;

        let put = report.steps_for("put").next().unwrap();
        assert_eq!(put.operation, "write_behind");
        assert_eq!(put.outcome.error_kind(), Some(ErrorKind::OperationNotSupported));
    }
}
