use chrono::Utc;
use thiserror::Error;

use impensa_core::{ExpenseDraft, ExpenseRecord};

use crate::normalize::NormalizedRow;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("storage backend: {0}")]
    Backend(String),
}

/// Narrow seam to the record store. The import pipeline only ever inserts;
/// everything else the store can do stays behind its own crate.
pub trait ExpenseStore {
    fn insert_expense(
        &self,
        record: &ExpenseRecord,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub persisted: usize,
    pub attempted: usize,
}

/// Persists caller-approved rows one at a time and reports only the
/// aggregate counts.
///
/// Every record gets a fresh id; the whole batch shares one creation
/// instant, captured here. A row that fails to persist is logged at
/// `warn` and skipped — it never aborts the rest of the batch. Callers
/// wanting per-row diagnostics validate before invoking this.
pub async fn commit_rows<S: ExpenseStore>(store: &S, rows: &[NormalizedRow]) -> ImportOutcome {
    let now = Utc::now();
    let mut persisted = 0;

    for row in rows {
        let record = ExpenseRecord::from_draft(ExpenseDraft::from(row), now);
        match store.insert_expense(&record).await {
            Ok(()) => persisted += 1,
            Err(e) => {
                tracing::warn!(
                    description = %record.description,
                    date = %record.date,
                    "skipping row that failed to persist: {e}"
                );
            }
        }
    }

    ImportOutcome {
        persisted,
        attempted: rows.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use impensa_core::{CategoryId, Money};
    use std::sync::Mutex;

    /// In-memory store that rejects configured descriptions, standing in
    /// for a referential-constraint failure.
    struct MockStore {
        inserted: Mutex<Vec<ExpenseRecord>>,
        reject: Vec<&'static str>,
    }

    impl MockStore {
        fn new(reject: Vec<&'static str>) -> Self {
            Self {
                inserted: Mutex::new(Vec::new()),
                reject,
            }
        }

        fn records(&self) -> Vec<ExpenseRecord> {
            self.inserted.lock().unwrap().clone()
        }
    }

    impl ExpenseStore for MockStore {
        async fn insert_expense(&self, record: &ExpenseRecord) -> Result<(), StoreError> {
            if self.reject.contains(&record.description.as_str()) {
                return Err(StoreError::Constraint(format!(
                    "no such category for {}",
                    record.description
                )));
            }
            self.inserted.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn row(description: &str) -> NormalizedRow {
        NormalizedRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            amount: Money::from_cents(4999),
            description: description.to_string(),
            category_id: Some(CategoryId::from("c1")),
        }
    }

    #[tokio::test]
    async fn persists_every_row_and_counts() {
        let store = MockStore::new(vec![]);
        let rows = vec![row("A"), row("B"), row("C")];
        let outcome = commit_rows(&store, &rows).await;
        assert_eq!(outcome.persisted, 3);
        assert_eq!(outcome.attempted, 3);
        assert_eq!(store.records().len(), 3);
    }

    #[tokio::test]
    async fn middle_failure_does_not_abort_the_batch() {
        let store = MockStore::new(vec!["B"]);
        let rows = vec![row("A"), row("B"), row("C")];
        let outcome = commit_rows(&store, &rows).await;
        assert_eq!(outcome.persisted, 2);
        assert_eq!(outcome.attempted, 3);
        let descriptions: Vec<String> = store
            .records()
            .iter()
            .map(|r| r.description.clone())
            .collect();
        assert_eq!(descriptions, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn batch_shares_one_timestamp_with_unique_ids() {
        let store = MockStore::new(vec![]);
        let rows = vec![row("A"), row("B")];
        commit_rows(&store, &rows).await;
        let records = store.records();
        assert_eq!(records[0].created_at, records[1].created_at);
        assert_eq!(records[0].created_at, records[0].updated_at);
        assert_ne!(records[0].id, records[1].id);
    }

    #[tokio::test]
    async fn empty_batch_is_a_zero_outcome() {
        let store = MockStore::new(vec![]);
        let outcome = commit_rows(&store, &[]).await;
        assert_eq!(outcome.persisted, 0);
        assert_eq!(outcome.attempted, 0);
    }
}
