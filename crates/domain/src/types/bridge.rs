//! Obfuscation bridge configuration

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Shadowsocks bridge the obfuscation component connected through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowsocksConfiguration {
    pub address: IpAddr,
    pub port: u16,
    pub password: String,
    pub cipher: String,
}
