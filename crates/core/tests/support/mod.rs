//! Shared test helpers for `vpnrest-core` integration tests.
//!
//! Scripted transports and token sources so executor tests can focus on
//! behaviour instead of boilerplate.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use vpnrest_core::{
    AccessTokenSource, RequestFactory, RestContext, StaticAddressCache, TokenCache, Transport,
    TransportRegistry,
};
use vpnrest_domain::{
    AccessToken, Endpoint, RestRequest, RestResponse, Result as DomainResult, TransportError,
};

pub type SendResult = Result<RestResponse, TransportError>;

/// Transport answering from a script, then repeating a fallback answer.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<SendResult>>,
    fallback: SendResult,
    requests: Mutex<Vec<RestRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<SendResult>, fallback: SendResult) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Always answers with `result`
    pub fn always(result: SendResult) -> Arc<Self> {
        Self::new(Vec::new(), result)
    }

    pub fn sends(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<RestRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send(&self, request: RestRequest) -> SendResult {
        self.requests.lock().push(request);
        let next = self.script.lock().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

/// Transport whose sends never complete
#[derive(Default)]
pub struct HangingTransport {
    pub sends: AtomicUsize,
}

#[async_trait]
impl Transport for HangingTransport {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn send(&self, _request: RestRequest) -> SendResult {
        self.sends.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

/// Token source counting authentication calls
pub struct CountingTokenSource {
    pub calls: AtomicUsize,
    delay: Duration,
}

impl CountingTokenSource {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), delay })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessTokenSource for CountingTokenSource {
    async fn fetch_access_token(&self, account_number: &str) -> DomainResult<AccessToken> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(AccessToken::new(
            format!("token-{account_number}-{call}"),
            Utc::now() + chrono::Duration::hours(1),
        ))
    }
}

pub fn endpoint() -> Endpoint {
    "45.83.223.196:443".parse().unwrap()
}

pub fn factory() -> RequestFactory {
    RequestFactory::new("api.example.net", "/app/v1")
}

pub fn json(status: u16, body: &str) -> SendResult {
    Ok(RestResponse::new(status, body.as_bytes().to_vec()))
}

/// Context with `transport` registered and a static endpoint
pub fn context(transport: Arc<dyn Transport>) -> RestContext {
    RestContext::new(
        Arc::new(TransportRegistry::with_transport(transport)),
        Arc::new(StaticAddressCache::new(endpoint())),
    )
}

/// Context with `transport` and a token cache over `source`
pub fn authorized_context(
    transport: Arc<dyn Transport>,
    source: Arc<dyn AccessTokenSource>,
) -> (RestContext, Arc<TokenCache>) {
    let tokens = Arc::new(TokenCache::new(source));
    (context(transport).with_authorization(tokens.clone()), tokens)
}
