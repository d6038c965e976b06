//! Configuration structures
//!
//! Every field has a serde default so partial JSON/TOML documents load.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    default_endpoint, DEFAULT_API_HOSTNAME, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SCHEME,
};
use crate::types::Endpoint;

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub obfuscation: ObfuscationConfig,
}

/// How to reach the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    #[serde(default = "default_endpoint")]
    pub default_endpoint: Endpoint,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            default_endpoint: default_endpoint(),
            scheme: default_scheme(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where shared cache files live and whether this process may write them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_dir")]
    pub directory: PathBuf,
    /// Restricted processes only observe the caches
    #[serde(default)]
    pub read_only: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { directory: default_cache_dir(), read_only: false }
    }
}

/// Local listener provided by the external obfuscation component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObfuscationConfig {
    /// Local forwarding address of the bridge, e.g. `127.0.0.1:1080`.
    /// Connections made there are relayed to the API by the bridge.
    #[serde(default)]
    pub proxy_address: Option<SocketAddr>,
}

fn default_hostname() -> String {
    DEFAULT_API_HOSTNAME.to_string()
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("vpnrest")
}
