//! HTTP transports built on reqwest

pub mod client;

pub use client::{HttpTransport, HttpTransportBuilder};
