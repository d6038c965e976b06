//! API endpoint addresses and the cached address list

use std::collections::HashSet;
use std::fmt;
use std::net::{IpAddr, SocketAddr, SocketAddrV4, SocketAddrV6};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

/// IP endpoint of an API server
///
/// Serialized as `1.2.3.4:443` or `[::1]:443`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum Endpoint {
    V4(SocketAddrV4),
    V6(SocketAddrV6),
}

impl Endpoint {
    pub fn new(ip: IpAddr, port: u16) -> Self {
        SocketAddr::new(ip, port).into()
    }

    pub fn ip(&self) -> IpAddr {
        match self {
            Self::V4(addr) => IpAddr::V4(*addr.ip()),
            Self::V6(addr) => IpAddr::V6(*addr.ip()),
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            Self::V4(addr) => addr.port(),
            Self::V6(addr) => addr.port(),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        match self {
            Self::V4(addr) => SocketAddr::V4(*addr),
            Self::V6(addr) => SocketAddr::V6(*addr),
        }
    }
}

impl From<SocketAddr> for Endpoint {
    fn from(value: SocketAddr) -> Self {
        match value {
            SocketAddr::V4(addr) => Self::V4(addr),
            SocketAddr::V6(addr) => Self::V6(addr),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4(addr) => write!(f, "{addr}"),
            Self::V6(addr) => write!(f, "{addr}"),
        }
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<SocketAddr>()
            .map(Self::from)
            .map_err(|e| format!("Invalid endpoint '{s}': {e}"))
    }
}

/// Persisted list of known API endpoints
///
/// The first endpoint is the one used for the next request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedAddresses {
    pub updated_at: DateTime<Utc>,
    pub endpoints: Vec<Endpoint>,
}

impl CachedAddresses {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self { updated_at: Utc::now(), endpoints }
    }

    /// Endpoint used for the next request
    pub fn current(&self) -> Option<Endpoint> {
        self.endpoints.first().copied()
    }

    /// Unordered comparison against another endpoint list
    pub fn same_set(&self, other: &[Endpoint]) -> bool {
        let ours: HashSet<_> = self.endpoints.iter().collect();
        let theirs: HashSet<_> = other.iter().collect();
        ours == theirs
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use super::*;

    #[test]
    fn test_parse_and_display_v4() {
        let endpoint: Endpoint = "45.83.223.196:443".parse().unwrap();
        assert_eq!(endpoint.ip(), IpAddr::V4(Ipv4Addr::new(45, 83, 223, 196)));
        assert_eq!(endpoint.port(), 443);
        assert_eq!(endpoint.to_string(), "45.83.223.196:443");
    }

    #[test]
    fn test_parse_and_display_v6() {
        let endpoint: Endpoint = "[::1]:8443".parse().unwrap();
        assert_eq!(endpoint.ip(), IpAddr::V6(Ipv6Addr::LOCALHOST));
        assert_eq!(endpoint.to_string(), "[::1]:8443");
    }

    #[test]
    fn test_rejects_missing_port() {
        assert!("1.2.3.4".parse::<Endpoint>().is_err());
    }

    #[test]
    fn test_json_uses_string_form() {
        let cached = CachedAddresses::new(vec!["1.2.3.4:443".parse().unwrap()]);
        let json = serde_json::to_value(&cached).unwrap();
        assert_eq!(json["endpoints"][0], "1.2.3.4:443");
        assert!(json.get("updatedAt").is_some());

        let back: CachedAddresses = serde_json::from_value(json).unwrap();
        assert_eq!(back, cached);
    }

    #[test]
    fn test_same_set_ignores_order() {
        let a: Endpoint = "1.1.1.1:443".parse().unwrap();
        let b: Endpoint = "2.2.2.2:443".parse().unwrap();
        let cached = CachedAddresses::new(vec![a, b]);
        assert!(cached.same_set(&[b, a]));
        assert!(!cached.same_set(&[a]));
    }
}
