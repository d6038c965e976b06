//! Account endpoints

use vpnrest_common::resilience::RetryStrategy;
use vpnrest_core::{
    ExecutorHandle, JsonResponseHandler, RequestDescriptor, RequestExecutor, RequestFactory,
    RestContext,
};
use vpnrest_domain::constants::ACCOUNTS_PATH_PREFIX;
use vpnrest_domain::ApiConfig;

use super::models::AccountData;

/// Proxy for `/accounts/v1/accounts`; every call is authorized
#[derive(Debug, Clone)]
pub struct AccountsProxy {
    context: RestContext,
    factory: RequestFactory,
}

impl AccountsProxy {
    pub fn new(context: RestContext, config: &ApiConfig) -> Self {
        Self { context, factory: RequestFactory::from_config(config, ACCOUNTS_PATH_PREFIX) }
    }

    pub fn get_account_data(
        &self,
        account_number: &str,
        retry_strategy: RetryStrategy,
    ) -> ExecutorHandle<AccountData> {
        let descriptor = RequestDescriptor::get("get-my-account", "accounts/me")
            .with_account(account_number)
            .with_retry_strategy(retry_strategy);
        RequestExecutor::new(
            self.context.clone(),
            self.factory.clone(),
            descriptor,
            JsonResponseHandler::<AccountData>::new(),
        )
        .spawn()
    }
}
