#![forbid(unsafe_code)]

pub mod csv_file;
pub mod repository;

pub use csv_file::CsvHistoryStore;
pub use repository::{HistoryStore, InMemoryHistoryStore, PracticeRecord, StorageError};
