//! File-backed caches shared between the daemon and restricted processes
//!
//! Every cache is a single JSON document accessed through
//! [`CoordinatedFile`](vpnrest_common::storage::CoordinatedFile). Storage
//! failures never surface to callers; they are logged and the cache falls
//! back to its default.

pub mod address_cache;
pub mod failure_counter;
pub mod shadowsocks;

pub use address_cache::EndpointCache;
pub use failure_counter::FileFailureCounter;
pub use shadowsocks::ShadowsocksConfigCache;
