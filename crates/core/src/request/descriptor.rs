//! Immutable description of one API call

use serde::Serialize;
use vpnrest_common::resilience::RetryStrategy;
use vpnrest_domain::{HttpMethod, RestError, Result};

use super::path::PathTemplate;

/// What to call and how, independent of endpoint and transport
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Short name used in logs, e.g. `get-api-addrs`
    pub name: String,
    pub method: HttpMethod,
    pub path: PathTemplate,
    pub headers: Vec<(String, String)>,
    /// Encoded JSON body
    pub body: Option<Vec<u8>>,
    /// Validator from a previous response, sent as `If-None-Match`
    pub etag: Option<String>,
    /// Account whose access token authorizes the call
    pub account: Option<String>,
    pub retry_strategy: RetryStrategy,
}

impl RequestDescriptor {
    pub fn new(name: impl Into<String>, method: HttpMethod, path: impl Into<PathTemplate>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            etag: None,
            account: None,
            retry_strategy: RetryStrategy::default(),
        }
    }

    pub fn get(name: impl Into<String>, path: impl Into<PathTemplate>) -> Self {
        Self::new(name, HttpMethod::Get, path)
    }

    pub fn post(name: impl Into<String>, path: impl Into<PathTemplate>) -> Self {
        Self::new(name, HttpMethod::Post, path)
    }

    pub fn delete(name: impl Into<String>, path: impl Into<PathTemplate>) -> Self {
        Self::new(name, HttpMethod::Delete, path)
    }

    /// Encode `body` as JSON
    pub fn with_json_body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let bytes =
            serde_json::to_vec(body).map_err(|err| RestError::EncodePayload(err.to_string()))?;
        self.body = Some(bytes);
        Ok(self)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_etag(mut self, etag: Option<String>) -> Self {
        self.etag = etag;
        self
    }

    /// Require an access token for `account`
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_retry_strategy(mut self, retry_strategy: RetryStrategy) -> Self {
        self.retry_strategy = retry_strategy;
        self
    }

    pub fn requires_authorization(&self) -> bool {
        self.account.is_some()
    }
}
