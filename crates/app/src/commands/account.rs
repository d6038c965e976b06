//! Account and device commands; all of them need an account number

use vpnrest_common::resilience::RetryStrategy;
use vpnrest_domain::Result;
use vpnrest_infra::api::{AccountData, Device, SubmitVoucherResponse};

use super::expect_value;
use crate::AppContext;

pub async fn account_data(context: &AppContext, account_number: &str) -> Result<AccountData> {
    let handle = context.accounts.get_account_data(account_number, RetryStrategy::default());
    expect_value(handle.result().await?)
}

pub async fn list_devices(context: &AppContext, account_number: &str) -> Result<Vec<Device>> {
    let handle = context.devices.get_devices(account_number, RetryStrategy::default());
    expect_value(handle.result().await?)
}

/// Returns `false` when the device did not exist
pub async fn remove_device(
    context: &AppContext,
    account_number: &str,
    device_id: &str,
) -> Result<bool> {
    let handle = context.devices.delete_device(account_number, device_id, RetryStrategy::default());
    expect_value(handle.result().await?)
}

pub async fn submit_voucher(
    context: &AppContext,
    account_number: &str,
    voucher_code: &str,
) -> Result<SubmitVoucherResponse> {
    let handle =
        context.api.submit_voucher(voucher_code, account_number, RetryStrategy::default())?;
    expect_value(handle.result().await?)
}
