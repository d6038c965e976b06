//! Cache of the last working Shadowsocks bridge

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vpnrest_common::storage::CoordinatedFile;
use vpnrest_domain::constants::SHADOWSOCKS_CACHE_FILE;
use vpnrest_domain::{Result, ShadowsocksConfiguration};

use crate::errors::InfraError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedBridge {
    updated_at: DateTime<Utc>,
    config: ShadowsocksConfiguration,
}

/// Persists the bridge configuration the obfuscation component last used
/// successfully, so it can be tried first after a restart.
#[derive(Debug, Clone)]
pub struct ShadowsocksConfigCache {
    file: CoordinatedFile,
}

impl ShadowsocksConfigCache {
    pub fn new(directory: impl AsRef<Path>, read_only: bool) -> Self {
        let path = directory.as_ref().join(SHADOWSOCKS_CACHE_FILE);
        let file = if read_only { CoordinatedFile::read_only(path) } else { CoordinatedFile::new(path) };
        Self { file }
    }

    /// Last stored configuration; unreadable documents count as absent
    pub fn read(&self) -> Option<ShadowsocksConfiguration> {
        match self.file.read::<CachedBridge>() {
            Ok(cached) => cached.map(|cached| cached.config),
            Err(err) => {
                warn!(path = %self.file.path().display(), error = %err, "shadowsocks_cache.read_failed");
                None
            }
        }
    }

    /// Store a configuration, stamping it with the current time
    pub fn write(&self, config: &ShadowsocksConfiguration) -> Result<()> {
        let cached = CachedBridge { updated_at: Utc::now(), config: config.clone() };
        self.file.write(&cached).map_err(InfraError::from)?;
        debug!(address = %config.address, port = config.port, "shadowsocks_cache.updated");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.file.remove().map_err(InfraError::from)?;
        Ok(())
    }
}
