//! Bearer access tokens

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Short-lived bearer token issued for an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    #[serde(rename = "access_token")]
    pub value: String,
    pub expiry: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expiry: DateTime<Utc>) -> Self {
        Self { value: value.into(), expiry }
    }

    /// A token is usable only while `now < expiry`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry
    }

    pub fn is_expired(&self) -> bool {
        !self.is_valid_at(Utc::now())
    }
}
