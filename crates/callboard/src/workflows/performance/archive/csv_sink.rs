use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{ArchiveError, ArchivePublisher, ArchiveRecord};

/// Append-only CSV ledger of archive rows, header written once.
#[derive(Debug)]
pub struct CsvArchivePublisher {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvArchivePublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArchivePublisher for CsvArchivePublisher {
    fn publish(&self, record: &ArchiveRecord) -> Result<(), ArchiveError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}
