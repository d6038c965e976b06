//! # vpnrest Core
//!
//! Request orchestration for the REST client, free of real I/O.
//!
//! This crate contains:
//! - Port interfaces (transports, token sources, caches, failure counters)
//! - The coalescing access token cache
//! - Transport selection: strategy, registry and the switching transport
//! - Request building, response handlers and the per-request executor
//!
//! ## Architecture Principles
//! - Only depends on `vpnrest-common` and `vpnrest-domain`
//! - No file system, socket or HTTP code
//! - All external dependencies via traits

pub mod access_token;
pub mod executor;
pub mod request;
pub mod transport;

// Infrastructure ports
pub mod address_cache_ports;

// Re-export specific items to avoid ambiguity
pub use access_token::ports::{AccessTokenSource, AuthorizationProvider};
pub use access_token::TokenCache;
pub use address_cache_ports::{AddressCacheStore, StaticAddressCache};
pub use executor::{Completion, ExecutorHandle, ExecutorState, RequestExecutor, RestContext};
pub use request::{
    EmptyResponseHandler, ETagJsonResponseHandler, HandlerResult, JsonResponseHandler,
    PathTemplate, RequestDescriptor, RequestFactory, ResponseHandler,
};
pub use transport::ports::{FailureCounterStore, Transport};
pub use transport::{
    InMemoryFailureCounter, TransportRegistry, TransportStrategy, TransportSwitcher,
};
