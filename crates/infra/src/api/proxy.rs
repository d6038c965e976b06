//! Unauthenticated and account-level application endpoints

use std::sync::Arc;

use tracing::{info, instrument};
use vpnrest_common::resilience::RetryStrategy;
use vpnrest_core::{
    AddressCacheStore, EmptyResponseHandler, ETagJsonResponseHandler, ExecutorHandle,
    JsonResponseHandler, RequestDescriptor, RequestExecutor, RequestFactory, RestContext,
};
use vpnrest_domain::constants::{ACCOUNTS_PATH_PREFIX, APP_PATH_PREFIX};
use vpnrest_domain::{ApiConfig, Endpoint, Outcome, RestError, Result, Tagged};

use super::models::{ProblemReport, RelayList, SubmitVoucherRequest, SubmitVoucherResponse};

/// Proxy for `/app/v1` plus voucher submission
#[derive(Debug, Clone)]
pub struct ApiProxy {
    context: RestContext,
    app: RequestFactory,
    accounts: RequestFactory,
}

impl ApiProxy {
    pub fn new(context: RestContext, config: &ApiConfig) -> Self {
        Self {
            context,
            app: RequestFactory::from_config(config, APP_PATH_PREFIX),
            accounts: RequestFactory::from_config(config, ACCOUNTS_PATH_PREFIX),
        }
    }

    /// Fetch the list of API endpoints
    pub fn get_address_list(&self, retry_strategy: RetryStrategy) -> ExecutorHandle<Vec<Endpoint>> {
        let descriptor =
            RequestDescriptor::get("get-api-addrs", "api-addrs").with_retry_strategy(retry_strategy);
        RequestExecutor::new(
            self.context.clone(),
            self.app.clone(),
            descriptor,
            JsonResponseHandler::<Vec<Endpoint>>::new(),
        )
        .spawn()
    }

    /// Fetch the endpoint list and record it in the address cache
    #[instrument(skip(self))]
    pub async fn refresh_address_cache(&self, retry_strategy: RetryStrategy) -> Result<Vec<Endpoint>> {
        let endpoints = into_value(self.get_address_list(retry_strategy).result().await?)?;

        info!(count = endpoints.len(), "api.address_list_received");
        self.context.address_cache.set_endpoints(&endpoints);
        Ok(endpoints)
    }

    /// Fetch the relay list; with `etag` the server may answer "not modified"
    pub fn get_relays(
        &self,
        etag: Option<String>,
        retry_strategy: RetryStrategy,
    ) -> ExecutorHandle<Tagged<RelayList>> {
        let descriptor = RequestDescriptor::get("get-relays", "relays")
            .with_etag(etag)
            .with_retry_strategy(retry_strategy);
        RequestExecutor::new(
            self.context.clone(),
            self.app.clone(),
            descriptor,
            ETagJsonResponseHandler::<RelayList>::new(),
        )
        .spawn()
    }

    /// Credit a voucher to an account
    pub fn submit_voucher(
        &self,
        voucher_code: &str,
        account_number: &str,
        retry_strategy: RetryStrategy,
    ) -> Result<ExecutorHandle<SubmitVoucherResponse>> {
        let descriptor = RequestDescriptor::post("submit-voucher", "submit-voucher")
            .with_json_body(&SubmitVoucherRequest { voucher_code })?
            .with_account(account_number)
            .with_retry_strategy(retry_strategy);
        Ok(RequestExecutor::new(
            self.context.clone(),
            self.accounts.clone(),
            descriptor,
            JsonResponseHandler::<SubmitVoucherResponse>::new(),
        )
        .spawn())
    }

    pub fn send_problem_report(
        &self,
        report: &ProblemReport,
        retry_strategy: RetryStrategy,
    ) -> Result<ExecutorHandle<()>> {
        let descriptor = RequestDescriptor::post("send-problem-report", "problem-report")
            .with_json_body(report)?
            .with_retry_strategy(retry_strategy);
        Ok(RequestExecutor::new(
            self.context.clone(),
            self.app.clone(),
            descriptor,
            EmptyResponseHandler::any_success(),
        )
        .spawn())
    }

    /// Address cache the proxy reports discovered endpoints to
    pub fn address_cache(&self) -> &Arc<dyn AddressCacheStore> {
        &self.context.address_cache
    }
}

/// Drop the outcome wrapper for calls that can never be "not modified"
pub(crate) fn into_value<T>(outcome: Outcome<T>) -> Result<T> {
    outcome
        .value()
        .ok_or_else(|| RestError::Internal("unexpected not-modified response".to_string()))
}
