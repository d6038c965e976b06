//! JSON documents guarded by OS advisory file locks
//!
//! Readers take a shared lock, writers an exclusive one, on the document
//! itself. Writers rewrite the file in place while holding the exclusive
//! lock, so the inode never changes and a read-modify-write through
//! [`CoordinatedFile::update`] is atomic with respect to every other process
//! using the same path.
//!
//! Missing and empty files read as `None`. Unparsable content is reported
//! as [`StorageError::Corrupt`]; [`CoordinatedFile::update`] treats it as
//! absent and overwrites it.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fd_lock::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};

/// Handle to a lock-coordinated JSON document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatedFile {
    path: PathBuf,
    read_only: bool,
}

impl CoordinatedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), read_only: false }
    }

    /// Handle that may read but never creates or modifies the file
    pub fn read_only(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), read_only: true }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Read the document under a shared lock
    pub fn read<T: DeserializeOwned>(&self) -> StorageResult<Option<T>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let lock = RwLock::new(file);
        let guard = lock.read().map_err(|source| self.lock_error(source))?;
        let mut contents = String::new();
        (&*guard).read_to_string(&mut contents)?;
        drop(guard);

        self.parse(&contents)
    }

    /// Replace the document under an exclusive lock
    pub fn write<T: Serialize>(&self, value: &T) -> StorageResult<()> {
        self.ensure_writable()?;
        let bytes = serde_json::to_vec_pretty(value)?;

        let mut lock = RwLock::new(self.open_for_write()?);
        let mut guard = lock.write().map_err(|source| self.lock_error(source))?;
        replace_contents(&mut guard, &bytes)?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "storage.write");
        Ok(())
    }

    /// Read, transform and write back the document while holding one
    /// exclusive lock for the whole sequence.
    ///
    /// `f` receives `None` when the file is missing, empty or corrupt.
    /// Returns the value that was written.
    pub fn update<T, F>(&self, f: F) -> StorageResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Option<T>) -> T,
    {
        self.ensure_writable()?;

        let mut lock = RwLock::new(self.open_for_write()?);
        let mut guard = lock.write().map_err(|source| self.lock_error(source))?;

        let mut contents = String::new();
        guard.read_to_string(&mut contents)?;
        let current = match self.parse(&contents) {
            Ok(current) => current,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "storage.corrupt_overwritten");
                None
            }
        };

        let next = f(current);
        let bytes = serde_json::to_vec_pretty(&next)?;
        replace_contents(&mut guard, &bytes)?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "storage.update");
        Ok(next)
    }

    /// Delete the document. A missing file is not an error.
    pub fn remove(&self) -> StorageResult<()> {
        self.ensure_writable()?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn ensure_writable(&self) -> StorageResult<()> {
        if self.read_only {
            return Err(StorageError::ReadOnly(self.path.clone()));
        }
        Ok(())
    }

    fn open_for_write(&self) -> StorageResult<File> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        Ok(OpenOptions::new().read(true).write(true).create(true).truncate(false).open(&self.path)?)
    }

    fn parse<T: DeserializeOwned>(&self, contents: &str) -> StorageResult<Option<T>> {
        if contents.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(contents).map(Some).map_err(|err| StorageError::Corrupt {
            path: self.path.clone(),
            message: err.to_string(),
        })
    }

    fn lock_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Lock { path: self.path.clone(), source }
    }
}

fn replace_contents(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(bytes)?;
    file.sync_data()
}
