//! Commands exposed by the binary
//!
//! Thin wrappers that run one proxy call through the [`AppContext`] and
//! return a serializable value.

pub mod account;
pub mod api;
pub mod transport;

pub use account::{account_data, list_devices, remove_device, submit_voucher};
pub use api::{fetch_relays, refresh_addresses, send_problem_report, RelaysResult};
pub use transport::{bridge_config, reset_transport, transport_status, TransportStatus};

use vpnrest_domain::{Outcome, RestError, Result};

/// Unwrap an outcome of a call that is never conditional
fn expect_value<T>(outcome: Outcome<T>) -> Result<T> {
    outcome
        .value()
        .ok_or_else(|| RestError::Internal("unexpected not-modified response".to_string()))
}
