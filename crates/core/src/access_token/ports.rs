//! Port interfaces for access tokens

use async_trait::async_trait;
use vpnrest_domain::{AccessToken, Result};

/// Performs the actual authentication call for an account
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn fetch_access_token(&self, account_number: &str) -> Result<AccessToken>;
}

/// Hands out bearer tokens to request executors
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    /// Bearer token value for the account
    async fn authorization(&self, account_number: &str) -> Result<String>;

    /// Drop any cached token for the account so the next call re-authenticates
    fn invalidate(&self, account_number: &str);
}
