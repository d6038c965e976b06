//! Common utilities shared across vpnrest crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error classification and retry strategies (no I/O)
//! - `storage`: lock-coordinated JSON files shared between processes

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod resilience;

// Storage tier
// -----------------------------------------------------------------
#[cfg(feature = "storage")]
pub mod storage;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use error::{ErrorClassification, ErrorSeverity};
#[cfg(feature = "foundation")]
pub use resilience::{RetryDelay, RetryStrategy};
#[cfg(feature = "storage")]
pub use storage::{CoordinatedFile, StorageError, StorageResult};
