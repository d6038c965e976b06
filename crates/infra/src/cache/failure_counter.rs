//! Persisted transport failure counter

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vpnrest_common::storage::{CoordinatedFile, StorageError};
use vpnrest_core::FailureCounterStore;
use vpnrest_domain::constants::TRANSPORT_FAILURE_FILE;
use vpnrest_domain::{RestError, Result};

use crate::errors::InfraError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FailureRecord {
    failure_count: u32,
    updated_at: DateTime<Utc>,
}

impl FailureRecord {
    fn new(failure_count: u32) -> Self {
        Self { failure_count, updated_at: Utc::now() }
    }
}

/// Failure counter stored as `{ "failureCount", "updatedAt" }` in the cache
/// directory
///
/// Increments are read-modify-write sequences under one exclusive file lock,
/// so concurrent processes never lose an update. A read-only instance fails
/// every write; `TransportStrategy` then falls back to its in-memory count.
#[derive(Debug, Clone)]
pub struct FileFailureCounter {
    file: CoordinatedFile,
}

impl FileFailureCounter {
    pub fn new(directory: impl AsRef<Path>, read_only: bool) -> Self {
        let path = directory.as_ref().join(TRANSPORT_FAILURE_FILE);
        let file = if read_only { CoordinatedFile::read_only(path) } else { CoordinatedFile::new(path) };
        Self { file }
    }

    /// Time of the last change, if the counter was ever written
    pub fn updated_at(&self) -> Result<Option<DateTime<Utc>>> {
        let record = self.file.read::<FailureRecord>().map_err(storage_error)?;
        Ok(record.map(|record| record.updated_at))
    }
}

impl FailureCounterStore for FileFailureCounter {
    fn load(&self) -> Result<u32> {
        let record = self.file.read::<FailureRecord>().map_err(storage_error)?;
        Ok(record.map_or(0, |record| record.failure_count))
    }

    fn increment(&self) -> Result<u32> {
        let record = self
            .file
            .update(|current: Option<FailureRecord>| {
                let count = current.map_or(0, |record| record.failure_count);
                FailureRecord::new(count.saturating_add(1))
            })
            .map_err(storage_error)?;

        debug!(failure_count = record.failure_count, "failure_counter.incremented");
        Ok(record.failure_count)
    }

    fn reset(&self) -> Result<()> {
        self.file.write(&FailureRecord::new(0)).map_err(storage_error)
    }
}

fn storage_error(err: StorageError) -> RestError {
    InfraError::from(err).into()
}
