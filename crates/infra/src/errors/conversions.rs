//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use vpnrest_common::storage::StorageError;
use vpnrest_domain::{RestError, TransportError};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub RestError);

impl From<InfraError> for RestError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<RestError> for InfraError {
    fn from(value: RestError) -> Self {
        InfraError(value)
    }
}

/// Classify a client-library failure for the transport seam
pub trait IntoTransportError {
    fn into_transport_error(self) -> TransportError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportError */
/* -------------------------------------------------------------------------- */

impl IntoTransportError for HttpError {
    fn into_transport_error(self) -> TransportError {
        if self.is_timeout() {
            return TransportError::Timeout;
        }

        if self.is_connect() {
            return TransportError::Connect(describe(&self));
        }

        TransportError::Other(describe(&self))
    }
}

/// reqwest's top-level message hides the interesting part in the source chain
fn describe(err: &HttpError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_transport_error().into())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → RestError */
/* -------------------------------------------------------------------------- */

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(RestError::Internal(format!("storage failure: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
