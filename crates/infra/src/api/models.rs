//! Request and response bodies of the API

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account state returned by `accounts/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    pub id: String,
    pub expiry: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

impl AccountData {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiry
    }
}

/// WireGuard device registered on an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub pubkey: String,
    #[serde(default)]
    pub hijack_dns: bool,
    pub created: DateTime<Utc>,
    pub ipv4_address: String,
    pub ipv6_address: String,
    #[serde(default)]
    pub ports: Vec<DevicePort>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePort {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitVoucherResponse {
    pub time_added: u64,
    pub new_expiry: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SubmitVoucherRequest<'a> {
    pub voucher_code: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AccessTokenRequest<'a> {
    pub account_number: &'a str,
}

/// Problem report sent to support
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemReport {
    /// Reply address, may be empty
    pub address: String,
    pub message: String,
    pub log: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Relay list as served by `app/v1/relays`
///
/// Only the location table is typed; the tunnel sections are kept as raw
/// JSON for the relay selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayList {
    #[serde(default)]
    pub locations: BTreeMap<String, RelayLocation>,
    #[serde(flatten)]
    pub sections: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayLocation {
    pub country: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_decodes_snake_case() {
        let json = r#"{
            "id": "d1",
            "name": "tidy crab",
            "pubkey": "AAAA",
            "hijack_dns": true,
            "created": "2024-01-02T03:04:05Z",
            "ipv4_address": "10.64.0.1/32",
            "ipv6_address": "fc00:bbbb::1/128",
            "ports": [{"id": "p1"}]
        }"#;
        let device: Device = serde_json::from_str(json).unwrap();
        assert_eq!(device.name, "tidy crab");
        assert!(device.hijack_dns);
        assert_eq!(device.ports, vec![DevicePort { id: "p1".into() }]);
    }

    #[test]
    fn test_relay_list_keeps_unknown_sections() {
        let json = r#"{
            "locations": {"se-got": {"country": "Sweden", "city": "Gothenburg", "latitude": 57.7, "longitude": 11.9}},
            "wireguard": {"relays": []}
        }"#;
        let relays: RelayList = serde_json::from_str(json).unwrap();
        assert_eq!(relays.locations["se-got"].city, "Gothenburg");
        assert!(relays.sections.contains_key("wireguard"));
    }

    #[test]
    fn test_voucher_request_shape() {
        let json = serde_json::to_value(SubmitVoucherRequest { voucher_code: "ABCD" }).unwrap();
        assert_eq!(json, serde_json::json!({"voucher_code": "ABCD"}));
    }
}
