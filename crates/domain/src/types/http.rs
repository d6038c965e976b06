//! Wire-level request and response values exchanged with a transport

use std::time::Duration;

use super::endpoint::Endpoint;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP header names used by the client
pub mod header {
    pub const AUTHORIZATION: &str = "Authorization";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const ETAG: &str = "ETag";
    pub const HOST: &str = "Host";
    pub const IF_NONE_MATCH: &str = "If-None-Match";
}

/// HTTP status codes the client reasons about
pub mod status {
    pub const OK: u16 = 200;
    pub const CREATED: u16 = 201;
    pub const NO_CONTENT: u16 = 204;
    pub const NOT_MODIFIED: u16 = 304;

    pub fn is_success(status: u16) -> bool {
        (200..300).contains(&status)
    }
}

/// A fully built request, ready to be handed to a transport
///
/// `url` carries the API hostname; `endpoint` is the address the transport
/// must actually connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestRequest {
    pub method: HttpMethod,
    pub url: String,
    pub path_template: String,
    pub endpoint: Endpoint,
    pub hostname: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

impl RestRequest {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Raw response received from a transport
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RestResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RestResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, headers: Vec::new(), body: body.into() }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        status::is_success(self.status)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
}

/// Result of a successful call: a value, or "unchanged" for conditional GETs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Value(T),
    NotModified,
}

impl<T> Outcome<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::NotModified => None,
        }
    }

    pub fn is_not_modified(&self) -> bool {
        matches!(self, Self::NotModified)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Value(value) => Outcome::Value(f(value)),
            Self::NotModified => Outcome::NotModified,
        }
    }
}

/// Decoded value along with the validator the server sent for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged<T> {
    pub etag: Option<String>,
    pub value: T,
}

/// Family of transport used to reach the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Direct,
    Obfuscated,
}

crate::impl_domain_status_conversions!(TransportKind {
    Direct => "direct",
    Obfuscated => "obfuscated",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = RestResponse::new(200, b"{}".to_vec()).with_header("etag", "W/\"abc\"");
        assert_eq!(response.header(header::ETAG), Some("W/\"abc\""));
        assert_eq!(response.header("missing"), None);
    }

    #[test]
    fn test_success_range() {
        assert!(status::is_success(200));
        assert!(status::is_success(204));
        assert!(!status::is_success(304));
        assert!(!status::is_success(401));
    }

    #[test]
    fn test_outcome_map() {
        assert_eq!(Outcome::Value(2).map(|v| v * 2), Outcome::Value(4));
        assert!(Outcome::<i32>::NotModified.map(|v| v * 2).is_not_modified());
    }
}
