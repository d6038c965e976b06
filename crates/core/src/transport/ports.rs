//! Port interfaces for transports and the persisted failure counter

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use vpnrest_domain::{RestRequest, RestResponse, Result, TransportError};

/// Something that can put a built request on the wire
///
/// Implementations connect to `request.endpoint` while presenting
/// `request.hostname` for TLS and the `Host` header.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Send the request and return the raw response
    async fn send(&self, request: RestRequest) -> std::result::Result<RestResponse, TransportError>;
}

/// Storage for the consecutive connection failure counter
///
/// Shared between processes, so every operation must be atomic with
/// respect to other processes using the same store.
pub trait FailureCounterStore: Send + Sync {
    /// Current counter value, zero if nothing was stored yet
    fn load(&self) -> Result<u32>;

    /// Saturating increment; returns the new value
    fn increment(&self) -> Result<u32>;

    /// Set the counter back to zero
    fn reset(&self) -> Result<()>;
}

/// Failure counter that lives only as long as the process
#[derive(Debug, Default)]
pub struct InMemoryFailureCounter {
    count: AtomicU32,
}

impl InMemoryFailureCounter {
    pub fn new(initial: u32) -> Self {
        Self { count: AtomicU32::new(initial) }
    }
}

impl FailureCounterStore for InMemoryFailureCounter {
    fn load(&self) -> Result<u32> {
        Ok(self.count.load(Ordering::SeqCst))
    }

    fn increment(&self) -> Result<u32> {
        Ok(saturating_increment(&self.count))
    }

    fn reset(&self) -> Result<()> {
        self.count.store(0, Ordering::SeqCst);
        Ok(())
    }
}

pub(crate) fn saturating_increment(counter: &AtomicU32) -> u32 {
    let previous = counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| Some(count.saturating_add(1)))
        .unwrap_or_else(|count| count);
    previous.saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_counter_saturates() {
        let counter = InMemoryFailureCounter::new(u32::MAX - 1);
        assert_eq!(counter.increment().unwrap(), u32::MAX);
        assert_eq!(counter.increment().unwrap(), u32::MAX);
        counter.reset().unwrap();
        assert_eq!(counter.load().unwrap(), 0);
    }
}
