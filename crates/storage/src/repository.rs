use chrono::NaiveDate;
use kana_core::model::{Aggregate, Category, CounterRecord};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by history stores.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("corrupt record at line {line}: {reason}")]
    Corrupt { line: u64, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Persisted shape of one practice row: the counters one item collected
/// during one session, stamped with the session date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeRecord {
    pub date: NaiveDate,
    pub category: Category,
    pub item: String,
    pub counter: CounterRecord,
}

impl PracticeRecord {
    #[must_use]
    pub fn new(
        date: NaiveDate,
        category: Category,
        item: impl Into<String>,
        counter: CounterRecord,
    ) -> Self {
        Self {
            date,
            category,
            item: item.into(),
            counter,
        }
    }

    /// Accuracy with exactly two decimals, as written to storage.
    #[must_use]
    pub fn formatted_accuracy(&self) -> String {
        format!("{:.2}", self.counter.accuracy())
    }
}

/// Sum records per (category, item).
pub fn aggregate_records<'a>(records: impl IntoIterator<Item = &'a PracticeRecord>) -> Aggregate {
    records
        .into_iter()
        .map(|r| (r.category, r.item.as_str(), r.counter))
        .collect()
}

/// One record per answered item of a session aggregate.
#[must_use]
pub fn session_records(session: &Aggregate, date: NaiveDate) -> Vec<PracticeRecord> {
    session
        .touched()
        .map(|(category, item, counter)| PracticeRecord::new(date, category, item, counter))
        .collect()
}

/// Storage contract for practice history.
///
/// Implementors provide raw row access; `load` and `save` layer the
/// aggregation rules on top.
pub trait HistoryStore: Send + Sync {
    /// Read every persisted row, baseline rows included.
    ///
    /// A missing store is not an error: implementors create it empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store exists but cannot be read or parsed.
    fn read_records(&self) -> Result<Vec<PracticeRecord>, StorageError>;

    /// Append rows verbatim.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the rows cannot be written.
    fn append_records(&self, records: &[PracticeRecord]) -> Result<(), StorageError>;

    /// Replay all rows into per-item historical counters.
    ///
    /// # Errors
    ///
    /// Propagates `read_records` failures.
    fn load(&self) -> Result<Aggregate, StorageError> {
        let records = self.read_records()?;
        Ok(aggregate_records(&records))
    }

    /// Persist a finished session: one row per answered item, dated `date`.
    ///
    /// Returns the number of rows written. An untouched session writes
    /// nothing and leaves the store as it was.
    ///
    /// # Errors
    ///
    /// Propagates `append_records` failures.
    fn save(&self, session: &Aggregate, date: NaiveDate) -> Result<usize, StorageError> {
        let records = session_records(session, date);
        if records.is_empty() {
            return Ok(0);
        }
        self.append_records(&records)?;
        Ok(records.len())
    }
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryHistoryStore {
    baseline: Arc<Vec<PracticeRecord>>,
    records: Arc<Mutex<Vec<PracticeRecord>>>,
}

impl InMemoryHistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose loads always include `baseline` ahead of saved rows.
    #[must_use]
    pub fn with_baseline(baseline: Vec<PracticeRecord>) -> Self {
        Self {
            baseline: Arc::new(baseline),
            records: Arc::default(),
        }
    }

    /// Rows appended so far, baseline excluded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn persisted(&self) -> Result<Vec<PracticeRecord>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn read_records(&self) -> Result<Vec<PracticeRecord>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(self.baseline.iter().chain(guard.iter()).cloned().collect())
    }

    fn append_records(&self, records: &[PracticeRecord]) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.extend_from_slice(records);
        Ok(())
    }
}
