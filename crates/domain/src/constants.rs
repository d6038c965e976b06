//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! client.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::types::Endpoint;

// API defaults used before any discovery has happened
pub const DEFAULT_API_HOSTNAME: &str = "api.mullvad.net";
pub const DEFAULT_API_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(45, 83, 223, 196));
pub const DEFAULT_API_PORT: u16 = 443;
pub const DEFAULT_SCHEME: &str = "https";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// API path prefixes
pub const APP_PATH_PREFIX: &str = "/app/v1";
pub const ACCOUNTS_PATH_PREFIX: &str = "/accounts/v1";
pub const AUTH_PATH_PREFIX: &str = "/auth/v1";

// Cache file names, one per cache kind
pub const ADDRESS_CACHE_FILE: &str = "api-ip-address.json";
pub const SHADOWSOCKS_CACHE_FILE: &str = "shadowsocks-cache.json";
pub const TRANSPORT_FAILURE_FILE: &str = "transport-failures.json";

// Every n-th consecutive failure probes the direct transport again
pub const DIRECT_PROBE_INTERVAL: u32 = 3;

/// Endpoint used whenever the address cache is empty or unusable
pub fn default_endpoint() -> Endpoint {
    Endpoint::new(DEFAULT_API_IP, DEFAULT_API_PORT)
}
