//! Typed API proxies on top of the request executor
//!
//! Each proxy owns a [`RequestFactory`](vpnrest_core::RequestFactory) for
//! its path prefix and hands every call to a
//! [`RequestExecutor`](vpnrest_core::RequestExecutor). Calls return an
//! [`ExecutorHandle`](vpnrest_core::ExecutorHandle) so the caller can cancel
//! or observe them; `handle.result().await` yields the typed outcome.

pub mod accounts;
pub mod auth;
pub mod devices;
pub mod models;
pub mod proxy;

pub use accounts::AccountsProxy;
pub use auth::AuthenticationProxy;
pub use devices::DevicesProxy;
pub use models::{AccountData, Device, DevicePort, ProblemReport, RelayList, SubmitVoucherResponse};
pub use proxy::ApiProxy;
