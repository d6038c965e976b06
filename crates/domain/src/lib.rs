//! # vpnrest Domain
//!
//! Value types shared by every layer of the REST client.
//!
//! This crate contains:
//! - Endpoint, address cache and access token types
//! - Request/response values exchanged with transports
//! - The `RestError` taxonomy and Result alias
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other vpnrest crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
