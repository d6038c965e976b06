//! Bearer token acquisition with per-account request coalescing

pub mod cache;
pub mod ports;

pub use cache::TokenCache;
pub use ports::{AccessTokenSource, AuthorizationProvider};
