//! Mapping raw responses to typed results
//!
//! A [`ResponseHandler`] only classifies; decoding of success bodies is
//! returned as a closure so the executor decides when it runs. Anything a
//! handler does not recognise becomes [`HandlerResult::Unhandled`] with the
//! server's structured error body when one could be decoded.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use vpnrest_domain::{
    header, status, RestError, RestRequest, RestResponse, Result, ServerErrorResponse, Tagged,
};

/// Deferred body decoding
pub type DecodeFn<T> = Box<dyn FnOnce() -> Result<T> + Send>;

/// Classification of a response by a handler
pub enum HandlerResult<T> {
    /// Value available without decoding
    Success(T),
    /// Value must be decoded from the body
    Decode(DecodeFn<T>),
    /// 304 for a conditional request
    NotModified,
    /// Unexpected status, with the decoded server error if any
    Unhandled(Option<ServerErrorResponse>),
}

impl<T: fmt::Debug> fmt::Debug for HandlerResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(value) => f.debug_tuple("Success").field(value).finish(),
            Self::Decode(_) => f.write_str("Decode(..)"),
            Self::NotModified => f.write_str("NotModified"),
            Self::Unhandled(error) => f.debug_tuple("Unhandled").field(error).finish(),
        }
    }
}

/// Turns a response into a [`HandlerResult`]
pub trait ResponseHandler: Send + Sync + 'static {
    type Output: Send + 'static;

    fn handle(&self, request: &RestRequest, response: RestResponse) -> HandlerResult<Self::Output>;
}

/// Decode a `{code, detail|error}` body, if the response carries one
pub fn decode_server_error(body: &[u8]) -> Option<ServerErrorResponse> {
    serde_json::from_slice(body).ok()
}

fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|err| RestError::DecodeResponse(err.to_string()))
}

/// 304 counts as "not modified" only when the request was conditional
fn is_not_modified(request: &RestRequest, response: &RestResponse) -> bool {
    response.status == status::NOT_MODIFIED && request.header(header::IF_NONE_MATCH).is_some()
}

fn unhandled<T>(response: &RestResponse) -> HandlerResult<T> {
    HandlerResult::Unhandled(decode_server_error(&response.body))
}

/// Decodes any 2xx body as JSON `T`
pub struct JsonResponseHandler<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonResponseHandler<T> {
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T> Default for JsonResponseHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResponseHandler for JsonResponseHandler<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Output = T;

    fn handle(&self, request: &RestRequest, response: RestResponse) -> HandlerResult<T> {
        if response.is_success() {
            let body = response.body;
            HandlerResult::Decode(Box::new(move || decode_json(&body)))
        } else if is_not_modified(request, &response) {
            HandlerResult::NotModified
        } else {
            unhandled(&response)
        }
    }
}

/// Accepts a response without a body
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyResponseHandler {
    expected_status: Option<u16>,
}

impl EmptyResponseHandler {
    /// Accept any 2xx status
    pub fn any_success() -> Self {
        Self { expected_status: None }
    }

    /// Accept exactly `status`
    pub fn expecting(status: u16) -> Self {
        Self { expected_status: Some(status) }
    }
}

impl ResponseHandler for EmptyResponseHandler {
    type Output = ();

    fn handle(&self, _request: &RestRequest, response: RestResponse) -> HandlerResult<()> {
        let accepted = match self.expected_status {
            Some(expected) => response.status == expected,
            None => response.is_success(),
        };

        if accepted {
            HandlerResult::Success(())
        } else {
            unhandled(&response)
        }
    }
}

/// Decodes JSON `T` together with the response's `ETag`
pub struct ETagJsonResponseHandler<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> ETagJsonResponseHandler<T> {
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T> Default for ETagJsonResponseHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResponseHandler for ETagJsonResponseHandler<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Output = Tagged<T>;

    fn handle(&self, request: &RestRequest, response: RestResponse) -> HandlerResult<Tagged<T>> {
        if is_not_modified(request, &response) {
            return HandlerResult::NotModified;
        }
        if !response.is_success() {
            return unhandled(&response);
        }

        let etag = response.header(header::ETAG).map(str::to_string);
        let body = response.body;
        HandlerResult::Decode(Box::new(move || {
            decode_json(&body).map(|value| Tagged { etag, value })
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::Deserialize;
    use vpnrest_domain::HttpMethod;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Relay {
        hostname: String,
    }

    fn request(if_none_match: Option<&str>) -> RestRequest {
        let mut headers = Vec::new();
        if let Some(etag) = if_none_match {
            headers.push((header::IF_NONE_MATCH.to_string(), etag.to_string()));
        }
        RestRequest {
            method: HttpMethod::Get,
            url: "https://api.example.net:443/app/v1/relays".into(),
            path_template: "/relays".into(),
            endpoint: "1.2.3.4:443".parse().unwrap(),
            hostname: "api.example.net".into(),
            headers,
            body: None,
            timeout: Duration::from_secs(1),
        }
    }

    fn decode<T>(result: HandlerResult<T>) -> Result<T> {
        match result {
            HandlerResult::Decode(decode) => decode(),
            HandlerResult::Success(value) => Ok(value),
            _ => panic!("expected a value"),
        }
    }

    #[test]
    fn test_json_handler_decodes_lazily() {
        let handler = JsonResponseHandler::<Relay>::new();
        let response = RestResponse::new(200, br#"{"hostname":"se-got-001"}"#.to_vec());
        let relay = decode(handler.handle(&request(None), response)).unwrap();
        assert_eq!(relay, Relay { hostname: "se-got-001".into() });
    }

    #[test]
    fn test_json_handler_reports_malformed_body() {
        let handler = JsonResponseHandler::<Relay>::new();
        let result = handler.handle(&request(None), RestResponse::new(200, b"[]".to_vec()));
        assert!(matches!(decode(result), Err(RestError::DecodeResponse(_))));
    }

    #[test]
    fn test_server_error_body_is_decoded() {
        let handler = JsonResponseHandler::<Relay>::new();
        let body = br#"{"code":"INVALID_ACCESS_TOKEN","detail":"expired"}"#.to_vec();
        match handler.handle(&request(None), RestResponse::new(401, body)) {
            HandlerResult::Unhandled(Some(error)) => {
                assert_eq!(error.code, "INVALID_ACCESS_TOKEN");
                assert_eq!(error.detail.as_deref(), Some("expired"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unstructured_error_body() {
        let handler = EmptyResponseHandler::any_success();
        let result = handler.handle(&request(None), RestResponse::new(502, b"<html>".to_vec()));
        assert!(matches!(result, HandlerResult::Unhandled(None)));
    }

    #[test]
    fn test_empty_handler_expected_status() {
        let handler = EmptyResponseHandler::expecting(status::NO_CONTENT);
        assert!(matches!(
            handler.handle(&request(None), RestResponse::new(204, Vec::new())),
            HandlerResult::Success(())
        ));
        assert!(matches!(
            handler.handle(&request(None), RestResponse::new(200, Vec::new())),
            HandlerResult::Unhandled(_)
        ));
    }

    #[test]
    fn test_etag_handler_not_modified_only_when_conditional() {
        let handler = ETagJsonResponseHandler::<Relay>::new();
        let not_modified = RestResponse::new(304, Vec::new());

        assert!(matches!(
            handler.handle(&request(Some("W/\"abc\"")), not_modified.clone()),
            HandlerResult::NotModified
        ));
        assert!(matches!(
            handler.handle(&request(None), not_modified),
            HandlerResult::Unhandled(None)
        ));
    }

    #[test]
    fn test_etag_handler_returns_validator() {
        let handler = ETagJsonResponseHandler::<Relay>::new();
        let response = RestResponse::new(200, br#"{"hostname":"x"}"#.to_vec())
            .with_header("ETag", "\"v2\"");
        let tagged = decode(handler.handle(&request(None), response)).unwrap();
        assert_eq!(tagged.etag.as_deref(), Some("\"v2\""));
        assert_eq!(tagged.value.hostname, "x");
    }
}
