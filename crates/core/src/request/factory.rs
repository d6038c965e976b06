//! Builds wire requests from descriptors

use std::time::Duration;

use vpnrest_domain::constants::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_SCHEME};
use vpnrest_domain::{header, ApiConfig, Endpoint, RestRequest, Result};

use super::descriptor::RequestDescriptor;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Request factory for one API path prefix
///
/// The URL always names the configured hostname and the endpoint's port;
/// the transport is told separately which IP to connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFactory {
    hostname: String,
    scheme: String,
    path_prefix: String,
    timeout: Duration,
}

impl RequestFactory {
    pub fn new(hostname: impl Into<String>, path_prefix: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            scheme: DEFAULT_SCHEME.to_string(),
            path_prefix: path_prefix.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn from_config(config: &ApiConfig, path_prefix: impl Into<String>) -> Self {
        Self::new(config.hostname.clone(), path_prefix)
            .with_scheme(config.scheme.clone())
            .with_timeout(config.request_timeout())
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Build the request for `endpoint`, authorized with `access_token`
    pub fn build(
        &self,
        descriptor: &RequestDescriptor,
        endpoint: Endpoint,
        access_token: Option<&str>,
    ) -> Result<RestRequest> {
        let path = descriptor.path.render()?;
        let url = format!(
            "{}://{}:{}{}",
            self.scheme,
            self.hostname,
            endpoint.port(),
            join_path(&self.path_prefix, &path)
        );

        let mut headers = vec![
            (header::HOST.to_string(), self.hostname.clone()),
            (header::CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()),
        ];
        if let Some(token) = access_token {
            headers.push((header::AUTHORIZATION.to_string(), format!("Bearer {token}")));
        }
        if let Some(etag) = &descriptor.etag {
            headers.push((header::IF_NONE_MATCH.to_string(), weak_etag(etag)));
        }
        headers.extend(descriptor.headers.iter().cloned());

        Ok(RestRequest {
            method: descriptor.method,
            url,
            path_template: descriptor.path.template().to_string(),
            endpoint,
            hostname: self.hostname.clone(),
            headers,
            body: descriptor.body.clone(),
            timeout: self.timeout,
        })
    }
}

fn join_path(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if prefix.is_empty() {
        format!("/{path}")
    } else if prefix.starts_with('/') {
        format!("{prefix}/{path}")
    } else {
        format!("/{prefix}/{path}")
    }
}

/// Format a validator as a weak entity tag, `W/"<etag>"`
///
/// An existing `W/` prefix and surrounding quotes are stripped first, so
/// strong and weak validators from the server both end up weak.
pub fn weak_etag(etag: &str) -> String {
    let bare = etag.trim();
    let bare = bare.strip_prefix("W/").unwrap_or(bare);
    let bare = bare.trim_matches('"');
    format!("W/\"{bare}\"")
}
