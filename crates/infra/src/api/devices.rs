//! Device endpoints

use vpnrest_common::resilience::RetryStrategy;
use vpnrest_core::request::decode_server_error;
use vpnrest_core::{
    ExecutorHandle, HandlerResult, JsonResponseHandler, PathTemplate, RequestDescriptor,
    RequestExecutor, RequestFactory, ResponseHandler, RestContext,
};
use vpnrest_domain::constants::ACCOUNTS_PATH_PREFIX;
use vpnrest_domain::{ApiConfig, RestRequest, RestResponse};

use super::models::Device;

const NOT_FOUND: u16 = 404;

/// Proxy for `/accounts/v1/devices`; every call is authorized
#[derive(Debug, Clone)]
pub struct DevicesProxy {
    context: RestContext,
    factory: RequestFactory,
}

impl DevicesProxy {
    pub fn new(context: RestContext, config: &ApiConfig) -> Self {
        Self { context, factory: RequestFactory::from_config(config, ACCOUNTS_PATH_PREFIX) }
    }

    pub fn get_devices(
        &self,
        account_number: &str,
        retry_strategy: RetryStrategy,
    ) -> ExecutorHandle<Vec<Device>> {
        let descriptor = RequestDescriptor::get("get-devices", "devices")
            .with_account(account_number)
            .with_retry_strategy(retry_strategy);
        self.spawn(descriptor, JsonResponseHandler::<Vec<Device>>::new())
    }

    pub fn get_device(
        &self,
        account_number: &str,
        identifier: &str,
        retry_strategy: RetryStrategy,
    ) -> ExecutorHandle<Device> {
        let descriptor = RequestDescriptor::get("get-device", device_path(identifier))
            .with_account(account_number)
            .with_retry_strategy(retry_strategy);
        self.spawn(descriptor, JsonResponseHandler::<Device>::new())
    }

    /// Delete a device; resolves to `false` if it was already gone
    pub fn delete_device(
        &self,
        account_number: &str,
        identifier: &str,
        retry_strategy: RetryStrategy,
    ) -> ExecutorHandle<bool> {
        let descriptor = RequestDescriptor::delete("delete-device", device_path(identifier))
            .with_account(account_number)
            .with_retry_strategy(retry_strategy);
        self.spawn(descriptor, DeleteDeviceHandler)
    }

    fn spawn<H: ResponseHandler>(
        &self,
        descriptor: RequestDescriptor,
        handler: H,
    ) -> ExecutorHandle<H::Output> {
        RequestExecutor::new(self.context.clone(), self.factory.clone(), descriptor, handler).spawn()
    }
}

fn device_path(identifier: &str) -> PathTemplate {
    PathTemplate::new("devices/{id}").with("id", identifier)
}

/// 2xx → deleted, 404 → nothing to delete
#[derive(Debug, Clone, Copy)]
struct DeleteDeviceHandler;

impl ResponseHandler for DeleteDeviceHandler {
    type Output = bool;

    fn handle(&self, _request: &RestRequest, response: RestResponse) -> HandlerResult<bool> {
        if response.is_success() {
            HandlerResult::Success(true)
        } else if response.status == NOT_FOUND {
            HandlerResult::Success(false)
        } else {
            HandlerResult::Unhandled(decode_server_error(&response.body))
        }
    }
}
