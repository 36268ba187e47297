use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::repository::{HistoryStore, PracticeRecord, StorageError};

mod mapping;

use mapping::{CsvRow, HEADER};

/// File-backed history store.
///
/// Rows live in a CSV file with a header line. An optional template file of
/// the same shape holds baseline rows that are merged into every load.
#[derive(Debug, Clone)]
pub struct CsvHistoryStore {
    path: PathBuf,
    template: Option<PathBuf>,
}

impl CsvHistoryStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            template: None,
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = Some(template.into());
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn template(&self) -> Option<&Path> {
        self.template.as_deref()
    }

    /// Write the header line if the data file is missing or empty.
    ///
    /// Returns `true` when the header was written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file or its parent directory cannot be
    /// created.
    pub fn ensure_created(&self) -> Result<bool, StorageError> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > 0 => return Ok(false),
            Ok(_) => {
                warn!(path = %self.path.display(), "practice data file is empty; writing header");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = self.path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
            }
            Err(e) => return Err(e.into()),
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(HEADER)?;
        writer.flush()?;
        info!(path = %self.path.display(), "created empty practice data store");
        Ok(true)
    }

    /// Copy the raw data file to `out`, byte for byte.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the store was never created, or
    /// `StorageError::Io` on read/write failures.
    pub fn export<W: Write>(&self, out: &mut W) -> Result<u64, StorageError> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StorageError::NotFound),
            Err(e) => return Err(e.into()),
        };
        let copied = io::copy(&mut file, out)?;
        out.flush()?;
        Ok(copied)
    }

    fn read_template(&self) -> Result<Vec<PracticeRecord>, StorageError> {
        match self.template.as_deref() {
            Some(template) if template.exists() => read_rows(template),
            Some(template) => {
                debug!(path = %template.display(), "no template file; skipping baseline rows");
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }
}

impl HistoryStore for CsvHistoryStore {
    fn read_records(&self) -> Result<Vec<PracticeRecord>, StorageError> {
        let mut records = self.read_template()?;
        let baseline = records.len();

        self.ensure_created()?;
        records.extend(read_rows(&self.path)?);

        debug!(
            path = %self.path.display(),
            baseline,
            persisted = records.len() - baseline,
            "loaded practice records"
        );
        Ok(records)
    }

    fn append_records(&self, records: &[PracticeRecord]) -> Result<(), StorageError> {
        self.ensure_created()?;

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for record in records {
            writer.serialize(CsvRow::from_record(record))?;
        }
        writer.flush()?;

        info!(path = %self.path.display(), rows = records.len(), "appended practice records");
        Ok(())
    }
}

fn read_rows(path: &Path) -> Result<Vec<PracticeRecord>, StorageError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    if !headers.iter().map(str::trim).eq(HEADER) {
        return Err(StorageError::Corrupt {
            line: 1,
            reason: format!(
                "unexpected header: {}",
                headers.iter().collect::<Vec<_>>().join(",")
            ),
        });
    }

    let mut out = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);
        let row: CsvRow = record
            .deserialize(Some(&headers))
            .map_err(|e| StorageError::Corrupt {
                line,
                reason: e.to_string(),
            })?;
        out.push(row.into_record(line)?);
    }
    Ok(out)
}
