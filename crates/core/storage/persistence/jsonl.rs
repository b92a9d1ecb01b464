//! Append-only log persistence for one snapshot collection.
//!
//! Every row is one JSON document per line. The whole file is replayed into
//! memory on open; writes go to the file first and become visible to readers
//! only once the whole batch has been written.
//!
//! A trailing line without its newline is a torn write. It is cut off on
//! open, and a failed batch is cut back to the length the file had before it,
//! so the next append always starts on a fresh line.

use crate::compute::temporal::predicate::HourPredicate;
use crate::error::StoreError;
use crate::storage::{SnapshotStore, StoredRow, select_exact, select_first_per_day, select_range};
use chrono::{DateTime, Utc};
use dockwatch_types::{Filter, Snapshot};
use parking_lot::{Mutex, RwLock};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Snapshot collection persisted as an append-only JSON-lines file.
pub struct LogStore<S> {
    path: PathBuf,
    /// Serializes appends
    writer: Mutex<File>,
    rows: RwLock<Vec<StoredRow<S>>>,
}

impl<S: Snapshot> LogStore<S> {
    /// Open the log at `path`, creating it and its parent directory if
    /// needed, and replay existing rows.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let rows = Self::recover(&path)?;
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        log::info!(
            "Opened {} log {} with {} rows",
            S::KIND,
            path.display(),
            rows.len()
        );

        Ok(Self {
            path,
            writer: Mutex::new(file),
            rows: RwLock::new(rows),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn recover(path: &Path) -> Result<Vec<StoredRow<S>>, StoreError> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        let mut rows = Vec::new();
        let mut line = Vec::new();
        let mut complete: u64 = 0;
        let mut number = 0usize;

        loop {
            line.clear();
            let read = reader.read_until(b'\n', &mut line)?;
            if read == 0 {
                break;
            }
            number += 1;
            if line.last() != Some(&b'\n') {
                log::warn!(
                    "Discarding incomplete {} row at {}:{} ({} bytes)",
                    S::KIND,
                    path.display(),
                    number,
                    read
                );
                break;
            }
            complete += read as u64;

            let text = line.trim_ascii();
            if text.is_empty() {
                continue;
            }
            match serde_json::from_slice::<S>(text) {
                Ok(snapshot) => rows.push(StoredRow {
                    seq: rows.len() as u64,
                    snapshot,
                }),
                Err(e) => log::warn!(
                    "Skipping corrupted {} row at {}:{}: {}",
                    S::KIND,
                    path.display(),
                    number,
                    e
                ),
            }
        }
        drop(reader);

        if complete < file_len {
            OpenOptions::new().write(true).open(path)?.set_len(complete)?;
        }
        Ok(rows)
    }
}

impl<S: Snapshot> SnapshotStore<S> for LogStore<S> {
    fn insert_many(&self, snapshots: Vec<S>) -> Result<usize, StoreError> {
        if snapshots.is_empty() {
            return Ok(0);
        }

        // Encode the whole batch before touching the file so a serialization
        // failure writes nothing.
        let mut encoded = Vec::new();
        for snapshot in &snapshots {
            serde_json::to_writer(&mut encoded, snapshot)?;
            encoded.push(b'\n');
        }

        let mut file = self.writer.lock();
        let before = file.metadata()?.len();
        if let Err(e) = file.write_all(&encoded).and_then(|()| file.flush()) {
            if let Err(rollback) = file.set_len(before) {
                log::error!(
                    "Failed to cut {} back to {} bytes after a failed append: {}",
                    self.path.display(),
                    before,
                    rollback
                );
            }
            return Err(e.into());
        }

        let count = snapshots.len();
        let mut rows = self.rows.write();
        let mut seq = rows.len() as u64;
        for snapshot in snapshots {
            rows.push(StoredRow { seq, snapshot });
            seq += 1;
        }
        Ok(count)
    }

    fn find_exact(
        &self,
        predicate: &HourPredicate,
        filters: &[Filter],
    ) -> Result<Vec<S>, StoreError> {
        Ok(select_exact(&self.rows.read(), predicate, filters))
    }

    fn find_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        filters: &[Filter],
    ) -> Result<Vec<S>, StoreError> {
        Ok(select_range(&self.rows.read(), from, to, filters))
    }

    fn aggregate_first_per_day(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        filters: &[Filter],
    ) -> Result<Vec<S>, StoreError> {
        Ok(select_first_per_day(&self.rows.read(), from, to, filters))
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.rows.read().len())
    }
}
