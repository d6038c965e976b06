//! Domain types and models

pub mod bridge;
pub mod endpoint;
pub mod http;
pub mod server_error;
pub mod token;

pub use bridge::ShadowsocksConfiguration;
pub use endpoint::{CachedAddresses, Endpoint};
pub use http::{header, status, HttpMethod, Outcome, RestRequest, RestResponse, Tagged, TransportKind};
pub use server_error::{ServerErrorCode, ServerErrorResponse};
pub use token::AccessToken;
