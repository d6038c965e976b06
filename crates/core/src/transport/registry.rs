//! Process-wide holder of the active transport

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;
use vpnrest_domain::{RestError, Result};

use super::ports::Transport;

/// Single-slot cell holding the transport requests are sent through
///
/// The lock is held only while the pointer is read or swapped, never
/// across a send.
#[derive(Default)]
pub struct TransportRegistry {
    slot: Mutex<Option<Arc<dyn Transport>>>,
}

impl TransportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-filled with a transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { slot: Mutex::new(Some(transport)) }
    }

    /// Replace the active transport
    pub fn set_transport(&self, transport: Arc<dyn Transport>) {
        debug!(transport = transport.name(), "transport_registry.set");
        *self.slot.lock() = Some(transport);
    }

    /// Remove the active transport; subsequent sends fail fast
    pub fn clear(&self) {
        debug!("transport_registry.cleared");
        self.slot.lock().take();
    }

    /// Active transport, if one is configured
    pub fn transport(&self) -> Option<Arc<dyn Transport>> {
        self.slot.lock().clone()
    }

    /// Active transport or [`RestError::NoTransport`]
    pub fn require(&self) -> Result<Arc<dyn Transport>> {
        self.transport().ok_or(RestError::NoTransport)
    }
}

impl std::fmt::Debug for TransportRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.slot.lock().as_ref().map(|t| t.name().to_string());
        f.debug_struct("TransportRegistry").field("transport", &name).finish()
    }
}
