//! Transport selection
//!
//! [`TransportStrategy`] decides which transport family the next attempt
//! should use, [`TransportSwitcher`] applies that decision per request and
//! [`TransportRegistry`] holds whatever transport is active right now.

pub mod ports;
pub mod registry;
pub mod strategy;
pub mod switcher;

pub use ports::{FailureCounterStore, InMemoryFailureCounter, Transport};
pub use registry::TransportRegistry;
pub use strategy::TransportStrategy;
pub use switcher::TransportSwitcher;
