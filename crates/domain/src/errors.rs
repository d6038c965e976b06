//! Error types used throughout the REST client

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ServerErrorCode, ServerErrorResponse};

/// Categories of REST errors for retry and reporting decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request could not be constructed (never retried)
    Request,
    /// Connectivity failure or transport-level error (retried per strategy)
    Network,
    /// The server answered with an unexpected status (not retried)
    Server,
    /// The server answered with a body that could not be decoded
    Decode,
    /// Authorization could not be obtained
    Authorization,
    /// The operation was cancelled by the caller
    Cancelled,
    /// Invariant violations and setup problems
    Internal,
}

crate::impl_domain_status_conversions!(ErrorCategory {
    Request => "request",
    Network => "network",
    Server => "server",
    Decode => "decode",
    Authorization => "authorization",
    Cancelled => "cancelled",
    Internal => "internal",
});

/// Main error type for REST operations
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum RestError {
    #[error("Failed to create request: {0}")]
    CreateRequest(String),

    #[error("Failed to encode payload: {0}")]
    EncodePayload(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("No transport configured")]
    NoTransport,

    #[error("Unhandled response (status {status}){}", describe_server_error(.server_error))]
    Unhandled { status: u16, server_error: Option<ServerErrorResponse> },

    #[error("Failed to decode response: {0}")]
    DecodeResponse(String),

    #[error("Authorization failed: {0}")]
    Authorization(Box<RestError>),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

fn describe_server_error(server_error: &Option<ServerErrorResponse>) -> String {
    match server_error {
        Some(response) => format!(": {response}"),
        None => String::new(),
    }
}

impl RestError {
    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CreateRequest(_) | Self::EncodePayload(_) => ErrorCategory::Request,
            Self::Network(_) | Self::Transport(_) => ErrorCategory::Network,
            Self::Unhandled { .. } => ErrorCategory::Server,
            Self::DecodeResponse(_) => ErrorCategory::Decode,
            Self::Authorization(_) => ErrorCategory::Authorization,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::NoTransport | Self::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Check if this error may be retried with backoff
    ///
    /// Only transport-level failures qualify; server answers, decode failures
    /// and request-construction errors reproduce on every attempt.
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Network
    }

    /// Whether this error represents cancellation rather than a failure
    pub fn is_cancellation(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::Authorization(inner) => inner.is_cancellation(),
            _ => false,
        }
    }

    /// Structured server error attached to an unhandled response, if any
    pub fn server_error(&self) -> Option<&ServerErrorResponse> {
        match self {
            Self::Unhandled { server_error, .. } => server_error.as_ref(),
            Self::Authorization(inner) => inner.server_error(),
            _ => None,
        }
    }

    /// Check whether the server rejected the bearer token
    pub fn is_invalid_access_token(&self) -> bool {
        self.server_error().is_some_and(|e| e.code() == ServerErrorCode::InvalidAccessToken)
    }

    /// Wrap an authorization failure, keeping cancellation unwrapped
    pub fn authorization(error: RestError) -> Self {
        if matches!(error, Self::Cancelled) {
            error
        } else {
            Self::Authorization(Box::new(error))
        }
    }
}

/// Result type alias for REST operations
pub type Result<T> = std::result::Result<T, RestError>;

/// Errors reported by a transport implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request cancelled")]
    Cancelled,

    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Not connected to the internet")]
    Offline,

    #[error("Transport failure: {0}")]
    Other(String),
}

impl TransportError {
    /// Whether the failure indicates the remote endpoint is unreachable
    ///
    /// Offline errors are excluded: the device itself has no connectivity,
    /// so switching transports cannot help.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Self::Timeout | Self::Connect(_))
    }
}

impl From<TransportError> for RestError {
    fn from(value: TransportError) -> Self {
        match value {
            TransportError::Cancelled => RestError::Cancelled,
            TransportError::Timeout | TransportError::Connect(_) | TransportError::Offline => {
                RestError::Network(value.to_string())
            }
            TransportError::Other(message) => RestError::Transport(message),
        }
    }
}
