//! # vpnrest Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - File-backed caches (API endpoints, transport failures, bridge config)
//! - reqwest transports (direct and through the obfuscation bridge)
//! - Typed API proxies and the access token source
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `vpnrest-core`
//! - Depends on `vpnrest-common` and `vpnrest-domain`
//! - Contains all "impure" code (files, sockets, environment)

pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{AccountsProxy, ApiProxy, AuthenticationProxy, DevicesProxy};
pub use cache::{EndpointCache, FileFailureCounter, ShadowsocksConfigCache};
pub use errors::{InfraError, IntoTransportError};
pub use http::{HttpTransport, HttpTransportBuilder};
