//! Transport that picks direct or obfuscated per request

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use vpnrest_domain::{RestRequest, RestResponse, TransportError, TransportKind};

use super::ports::Transport;
use super::strategy::TransportStrategy;

/// Routes each request through the transport suggested by a
/// [`TransportStrategy`] and reports connection failures back to it.
///
/// Without an obfuscated transport every request goes direct.
pub struct TransportSwitcher {
    direct: Arc<dyn Transport>,
    obfuscated: Option<Arc<dyn Transport>>,
    strategy: Arc<TransportStrategy>,
}

impl TransportSwitcher {
    pub fn new(
        direct: Arc<dyn Transport>,
        obfuscated: Option<Arc<dyn Transport>>,
        strategy: Arc<TransportStrategy>,
    ) -> Self {
        Self { direct, obfuscated, strategy }
    }

    pub fn strategy(&self) -> &Arc<TransportStrategy> {
        &self.strategy
    }

    fn select(&self) -> (TransportKind, &Arc<dyn Transport>) {
        match (self.strategy.suggested_transport(), &self.obfuscated) {
            (TransportKind::Obfuscated, Some(obfuscated)) => (TransportKind::Obfuscated, obfuscated),
            _ => (TransportKind::Direct, &self.direct),
        }
    }
}

#[async_trait]
impl Transport for TransportSwitcher {
    fn name(&self) -> &str {
        "switcher"
    }

    async fn send(&self, request: RestRequest) -> Result<RestResponse, TransportError> {
        let (kind, transport) = self.select();
        debug!(transport = %kind, via = transport.name(), "transport_switcher.selected");

        let result = transport.send(request).await;
        if let Err(err) = &result {
            if err.is_connection_failure() {
                self.strategy.on_failure();
            }
        }
        result
    }
}
