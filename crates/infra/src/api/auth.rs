//! Access token endpoint

use async_trait::async_trait;
use tracing::debug;
use vpnrest_common::resilience::RetryStrategy;
use vpnrest_core::{
    AccessTokenSource, ExecutorHandle, JsonResponseHandler, RequestDescriptor, RequestExecutor,
    RequestFactory, RestContext,
};
use vpnrest_domain::constants::AUTH_PATH_PREFIX;
use vpnrest_domain::{AccessToken, ApiConfig, Result};

use super::models::AccessTokenRequest;
use super::proxy::into_value;

/// Proxy for `/auth/v1`
///
/// Must be built on a context without an authorization provider: it is
/// the provider's own token source.
#[derive(Debug, Clone)]
pub struct AuthenticationProxy {
    context: RestContext,
    factory: RequestFactory,
    retry_strategy: RetryStrategy,
}

impl AuthenticationProxy {
    pub fn new(context: RestContext, config: &ApiConfig) -> Self {
        Self {
            context,
            factory: RequestFactory::from_config(config, AUTH_PATH_PREFIX),
            retry_strategy: RetryStrategy::default(),
        }
    }

    /// Retry strategy used when the token cache asks for a token
    pub fn with_retry_strategy(mut self, retry_strategy: RetryStrategy) -> Self {
        self.retry_strategy = retry_strategy;
        self
    }

    pub fn get_access_token(
        &self,
        account_number: &str,
        retry_strategy: RetryStrategy,
    ) -> Result<ExecutorHandle<AccessToken>> {
        let descriptor = RequestDescriptor::post("get-access-token", "token")
            .with_json_body(&AccessTokenRequest { account_number })?
            .with_retry_strategy(retry_strategy);
        Ok(RequestExecutor::new(
            self.context.clone(),
            self.factory.clone(),
            descriptor,
            JsonResponseHandler::<AccessToken>::new(),
        )
        .spawn())
    }
}

#[async_trait]
impl AccessTokenSource for AuthenticationProxy {
    async fn fetch_access_token(&self, account_number: &str) -> Result<AccessToken> {
        let outcome = self.get_access_token(account_number, self.retry_strategy)?.result().await?;
        let token = into_value(outcome)?;
        debug!(expiry = %token.expiry, "auth.access_token_received");
        Ok(token)
    }
}
