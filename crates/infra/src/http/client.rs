//! reqwest-backed transport
//!
//! The request URL always names the API hostname, so TLS verification and
//! the `Host` header see the real name. Where the TCP connection goes is
//! decided separately: a direct transport connects to the endpoint chosen
//! by the executor, an obfuscated one to the local forwarding address of
//! the bridge, which relays the bytes to the API.
//!
//! reqwest has no per-request socket address, so one client is kept per
//! `(hostname, address)` pair with the hostname pinned via `resolve`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client as ReqwestClient, Method};
use tracing::debug;
use url::Url;
use vpnrest_core::Transport;
use vpnrest_domain::{HttpMethod, RestRequest, RestResponse, TransportError, TransportKind};

use crate::errors::IntoTransportError;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Clients kept per transport; older entries are dropped once the address
/// cache has moved on to other endpoints
const MAX_CACHED_CLIENTS: usize = 4;

/// Transport putting requests on the wire with reqwest
pub struct HttpTransport {
    name: String,
    kind: TransportKind,
    forward_to: Option<SocketAddr>,
    connect_timeout: Duration,
    user_agent: Option<String>,
    accept_invalid_certs: bool,
    clients: Mutex<HashMap<(String, SocketAddr), ReqwestClient>>,
}

impl HttpTransport {
    /// Builder for a transport connecting straight to the request endpoint
    pub fn direct() -> HttpTransportBuilder {
        HttpTransportBuilder::new(TransportKind::Direct, None)
    }

    /// Builder for a transport connecting through the bridge at `forward_to`
    pub fn obfuscated(forward_to: SocketAddr) -> HttpTransportBuilder {
        HttpTransportBuilder::new(TransportKind::Obfuscated, Some(forward_to))
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    /// Address the TCP connection for `request` goes to
    pub fn connect_address(&self, request: &RestRequest) -> SocketAddr {
        self.forward_to.unwrap_or_else(|| request.endpoint.socket_addr())
    }

    fn client_for(&self, hostname: &str, address: SocketAddr) -> Result<ReqwestClient, TransportError> {
        let key = (hostname.to_string(), address);
        let mut clients = self.clients.lock();
        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }

        let mut builder = ReqwestClient::builder()
            .no_proxy()
            .connect_timeout(self.connect_timeout)
            .resolve(hostname, address);

        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(IntoTransportError::into_transport_error)?;
        if clients.len() >= MAX_CACHED_CLIENTS {
            debug!(transport = %self.name, evicted = clients.len(), "http.clients_evicted");
            clients.clear();
        }
        debug!(transport = %self.name, hostname, %address, "http.client_created");
        clients.insert(key, client.clone());
        Ok(client)
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("forward_to", &self.forward_to)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, request: RestRequest) -> Result<RestResponse, TransportError> {
        let address = self.connect_address(&request);
        let client = self.client_for(&request.hostname, address)?;

        let mut url = Url::parse(&request.url)
            .map_err(|e| TransportError::Other(format!("invalid url '{}': {e}", request.url)))?;
        url.set_port(Some(address.port()))
            .map_err(|()| TransportError::Other(format!("cannot set port on '{}'", request.url)))?;

        let mut builder = client.request(to_method(request.method), url).timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        debug!(
            transport = %self.name,
            method = %request.method,
            path = %request.path_template,
            %address,
            "http.send"
        );

        let response = builder.send().await.map_err(IntoTransportError::into_transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(IntoTransportError::into_transport_error)?;

        debug!(transport = %self.name, status, bytes = body.len(), "http.received");
        Ok(RestResponse { status, headers, body: body.to_vec() })
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Builder for [`HttpTransport`]
#[derive(Debug)]
pub struct HttpTransportBuilder {
    kind: TransportKind,
    forward_to: Option<SocketAddr>,
    name: Option<String>,
    connect_timeout: Duration,
    user_agent: Option<String>,
    accept_invalid_certs: bool,
}

impl HttpTransportBuilder {
    fn new(kind: TransportKind, forward_to: Option<SocketAddr>) -> Self {
        Self {
            kind,
            forward_to,
            name: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: None,
            accept_invalid_certs: false,
        }
    }

    /// Name used in logs; defaults to the transport kind
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Test-only helper to allow insecure TLS (e.g., self-signed certs).
    #[cfg(test)]
    pub fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    pub fn build(self) -> HttpTransport {
        HttpTransport {
            name: self.name.unwrap_or_else(|| self.kind.to_string()),
            kind: self.kind,
            forward_to: self.forward_to,
            connect_timeout: self.connect_timeout,
            user_agent: self.user_agent,
            accept_invalid_certs: self.accept_invalid_certs,
            clients: Mutex::new(HashMap::new()),
        }
    }
}
