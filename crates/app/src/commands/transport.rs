//! Local transport state; no network access

use chrono::{DateTime, Utc};
use serde::Serialize;
use vpnrest_domain::{Endpoint, ShadowsocksConfiguration, TransportKind};

use crate::AppContext;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportStatus {
    pub failure_count: u32,
    pub next_transport: String,
    pub obfuscation_available: bool,
    pub current_endpoint: Endpoint,
    pub endpoint_updated_at: Option<DateTime<Utc>>,
}

impl TransportStatus {
    pub fn next_transport_kind(&self) -> Option<TransportKind> {
        self.next_transport.parse().ok()
    }
}

pub fn transport_status(context: &AppContext) -> TransportStatus {
    let failure_count = context.transport_strategy.failure_count();
    TransportStatus {
        failure_count,
        next_transport: context.transport_strategy.suggested_transport().to_string(),
        obfuscation_available: context.config.obfuscation.proxy_address.is_some(),
        current_endpoint: context.address_cache.current_endpoint(),
        endpoint_updated_at: context.address_cache.updated_at(),
    }
}

/// Forget recorded connection failures so the next request goes direct
pub fn reset_transport(context: &AppContext) -> TransportStatus {
    context.transport_strategy.reset();
    transport_status(context)
}

/// Bridge configuration last stored by the obfuscation component
pub fn bridge_config(context: &AppContext) -> Option<ShadowsocksConfiguration> {
    context.shadowsocks_cache.read()
}
