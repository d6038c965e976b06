//! Persisted API endpoint cache
//!
//! Writable instances keep an in-memory copy of the document and write
//! through on every change. Read-only instances (restricted processes) hold
//! no copy and re-read the file on every access, so they observe updates
//! made by the writer immediately.

use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use vpnrest_common::storage::CoordinatedFile;
use vpnrest_core::AddressCacheStore;
use vpnrest_domain::constants::ADDRESS_CACHE_FILE;
use vpnrest_domain::{CachedAddresses, Endpoint};

/// Shared on-disk cache of API endpoints
#[derive(Debug)]
pub struct EndpointCache {
    file: CoordinatedFile,
    default_endpoint: Endpoint,
    memory: Option<Mutex<CachedAddresses>>,
}

impl EndpointCache {
    /// Open the cache stored in `directory`
    ///
    /// A writable instance seeds the file with `default_endpoint` when it is
    /// missing or unusable.
    pub fn new(directory: impl AsRef<Path>, default_endpoint: Endpoint, read_only: bool) -> Self {
        let path = directory.as_ref().join(ADDRESS_CACHE_FILE);

        if read_only {
            return Self { file: CoordinatedFile::read_only(path), default_endpoint, memory: None };
        }

        let file = CoordinatedFile::new(path);
        let initial = match read_valid(&file) {
            Some(cached) => cached,
            None => {
                let seeded = CachedAddresses::new(vec![default_endpoint]);
                if let Err(err) = file.write(&seeded) {
                    warn!(path = %file.path().display(), error = %err, "address_cache.seed_failed");
                }
                seeded
            }
        };

        debug!(endpoint = ?initial.current(), "address_cache.initialized");
        Self { file, default_endpoint, memory: Some(Mutex::new(initial)) }
    }

    pub fn is_read_only(&self) -> bool {
        self.memory.is_none()
    }

    /// Endpoint for the next request, or the default when nothing usable is stored
    pub fn current_endpoint(&self) -> Endpoint {
        self.snapshot().and_then(|cached| cached.current()).unwrap_or(self.default_endpoint)
    }

    /// All stored endpoints, or just the default when nothing usable is stored
    pub fn get_endpoints(&self) -> Vec<Endpoint> {
        self.snapshot()
            .map(|cached| cached.endpoints)
            .unwrap_or_else(|| vec![self.default_endpoint])
    }

    /// Time of the last successful update
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot().map(|cached| cached.updated_at)
    }

    /// Record a freshly fetched endpoint list
    ///
    /// Only the first endpoint is kept. If the stored endpoint is still part
    /// of `endpoints` it stays in place and only the timestamp is refreshed.
    pub fn set_endpoints(&self, endpoints: &[Endpoint]) {
        let Some(memory) = &self.memory else {
            debug!("address_cache.write_skipped_read_only");
            return;
        };
        let Some(first) = endpoints.first().copied() else {
            debug!("address_cache.empty_list_ignored");
            return;
        };

        let result = self.file.update(|stored: Option<CachedAddresses>| match stored {
            Some(mut cached) if cached.current().is_some_and(|e| endpoints.contains(&e)) => {
                cached.updated_at = Utc::now();
                cached
            }
            _ => CachedAddresses::new(vec![first]),
        });

        match result {
            Ok(cached) => {
                info!(endpoint = ?cached.current(), count = endpoints.len(), "address_cache.updated");
                *memory.lock() = cached;
            }
            Err(err) => {
                warn!(path = %self.file.path().display(), error = %err, "address_cache.write_failed");
            }
        }
    }

    fn snapshot(&self) -> Option<CachedAddresses> {
        match &self.memory {
            Some(memory) => Some(memory.lock().clone()),
            None => read_valid(&self.file),
        }
    }
}

impl AddressCacheStore for EndpointCache {
    fn current_endpoint(&self) -> Endpoint {
        EndpointCache::current_endpoint(self)
    }

    fn set_endpoints(&self, endpoints: &[Endpoint]) {
        EndpointCache::set_endpoints(self, endpoints)
    }
}

/// Stored document if it exists, parses and holds at least one endpoint
fn read_valid(file: &CoordinatedFile) -> Option<CachedAddresses> {
    match file.read::<CachedAddresses>() {
        Ok(Some(cached)) if !cached.endpoints.is_empty() => Some(cached),
        Ok(Some(_)) => {
            warn!(path = %file.path().display(), reason = "empty endpoint list", "address_cache.read_failed");
            None
        }
        Ok(None) => None,
        Err(err) => {
            warn!(path = %file.path().display(), error = %err, "address_cache.read_failed");
            None
        }
    }
}
