//! Structured error bodies returned by the API

use std::fmt;

use serde::{Deserialize, Serialize};

/// Known server error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerErrorCode {
    InvalidAccount,
    InvalidAccessToken,
    KeyLimitReached,
    PubKeyNotFound,
    TooManyDevices,
    DeviceNotFound,
    InvalidVoucher,
    VoucherAlreadyUsed,
    ServiceUnavailable,
    TooManyRequests,
    Unknown,
}

impl ServerErrorCode {
    pub fn from_code(code: &str) -> Self {
        match code {
            "INVALID_ACCOUNT" => Self::InvalidAccount,
            "INVALID_ACCESS_TOKEN" => Self::InvalidAccessToken,
            "KEY_LIMIT_REACHED" => Self::KeyLimitReached,
            "PUBKEY_NOT_FOUND" => Self::PubKeyNotFound,
            "MAX_DEVICES_REACHED" => Self::TooManyDevices,
            "DEVICE_NOT_FOUND" => Self::DeviceNotFound,
            "INVALID_VOUCHER" => Self::InvalidVoucher,
            "VOUCHER_USED" => Self::VoucherAlreadyUsed,
            "SERVICE_UNAVAILABLE" => Self::ServiceUnavailable,
            "TOO_MANY_REQUESTS" => Self::TooManyRequests,
            _ => Self::Unknown,
        }
    }
}

/// Server response in case of error (any status except 2xx/304)
///
/// The API sends the human readable message either as `detail` or as
/// `error` depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerErrorResponse {
    pub code: String,
    #[serde(default, alias = "error", skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ServerErrorResponse {
    pub fn new(code: impl Into<String>, detail: Option<String>) -> Self {
        Self { code: code.into(), detail }
    }

    pub fn code(&self) -> ServerErrorCode {
        ServerErrorCode::from_code(&self.code)
    }
}

impl fmt::Display for ServerErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} ({detail})", self.code),
            None => write!(f, "{}", self.code),
        }
    }
}
