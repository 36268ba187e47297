use chrono::NaiveDate;
use kana_core::model::{Category, CounterRecord};
use serde::{Deserialize, Serialize};

use crate::repository::{PracticeRecord, StorageError};

/// Column names of the practice data file.
pub(crate) const HEADER: [&str; 6] = ["Date", "Kana Type", "Kana", "Seen", "Correct", "Accuracy"];

/// One CSV line. `Accuracy` is informational: it is written with two
/// decimals and ignored on read, since it can be derived from the counters.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CsvRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Kana Type")]
    category: Category,
    #[serde(rename = "Kana")]
    item: String,
    #[serde(rename = "Seen")]
    seen: u32,
    #[serde(rename = "Correct")]
    correct: u32,
    #[serde(rename = "Accuracy")]
    accuracy: String,
}

impl CsvRow {
    pub(crate) fn from_record(record: &PracticeRecord) -> Self {
        Self {
            date: record.date,
            category: record.category,
            item: record.item.clone(),
            seen: record.counter.seen(),
            correct: record.counter.correct(),
            accuracy: record.formatted_accuracy(),
        }
    }

    pub(crate) fn into_record(self, line: u64) -> Result<PracticeRecord, StorageError> {
        let counter =
            CounterRecord::new(self.seen, self.correct).map_err(|e| StorageError::Corrupt {
                line,
                reason: e.to_string(),
            })?;
        Ok(PracticeRecord::new(
            self.date,
            self.category,
            self.item,
            counter,
        ))
    }
}
