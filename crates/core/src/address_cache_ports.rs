//! Port interface for the API address cache

use parking_lot::Mutex;
use vpnrest_domain::Endpoint;

/// Source of the endpoint the next request should connect to
///
/// Implementations never fail: when nothing usable is stored they answer
/// with their configured default endpoint.
pub trait AddressCacheStore: Send + Sync {
    /// Endpoint to use for the next request
    fn current_endpoint(&self) -> Endpoint;

    /// Record a freshly fetched endpoint list
    fn set_endpoints(&self, endpoints: &[Endpoint]);
}

/// Process-local address cache without persistence
///
/// Used where no cache directory is available and in tests.
#[derive(Debug)]
pub struct StaticAddressCache {
    current: Mutex<Endpoint>,
}

impl StaticAddressCache {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { current: Mutex::new(endpoint) }
    }
}

impl AddressCacheStore for StaticAddressCache {
    fn current_endpoint(&self) -> Endpoint {
        *self.current.lock()
    }

    fn set_endpoints(&self, endpoints: &[Endpoint]) {
        if let Some(first) = endpoints.first() {
            *self.current.lock() = *first;
        }
    }
}
