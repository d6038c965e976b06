//! Application-level API commands

use serde::Serialize;
use vpnrest_common::resilience::RetryStrategy;
use vpnrest_domain::{Endpoint, Outcome, Result};
use vpnrest_infra::api::{ProblemReport, RelayList};

use super::expect_value;
use crate::AppContext;

/// Fetch the API address list and record it in the address cache
pub async fn refresh_addresses(context: &AppContext) -> Result<Vec<Endpoint>> {
    context.api.refresh_address_cache(RetryStrategy::aggressive()).await
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelaysResult {
    pub not_modified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relays: Option<RelayList>,
}

/// Fetch the relay list, conditionally when `etag` is given
pub async fn fetch_relays(context: &AppContext, etag: Option<String>) -> Result<RelaysResult> {
    let result = match context.api.get_relays(etag, RetryStrategy::aggressive()).result().await? {
        Outcome::NotModified => RelaysResult { not_modified: true, etag: None, relays: None },
        Outcome::Value(tagged) => {
            RelaysResult { not_modified: false, etag: tagged.etag, relays: Some(tagged.value) }
        }
    };
    Ok(result)
}

pub async fn send_problem_report(context: &AppContext, report: &ProblemReport) -> Result<()> {
    let handle = context.api.send_problem_report(report, RetryStrategy::default())?;
    expect_value(handle.result().await?)
}
