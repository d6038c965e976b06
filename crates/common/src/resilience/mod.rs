//! Resilience patterns for transient failures
//!
//! Currently this is the retry strategy used by the REST request executor.
//! The strategy only decides *when* to retry; which transport family to use
//! for the next attempt is decided elsewhere (the transport strategy in
//! `vpnrest-core`).

pub mod retry;

pub use retry::{DelayIterator, RetryDelay, RetryError, RetryStrategy};
