//! Integration tests for the request executor
//!
//! Drives complete requests through scripted transports: retries, one-shot
//! re-authorization, conditional requests and cancellation.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use vpnrest_common::resilience::{RetryDelay, RetryStrategy};
use vpnrest_core::{
    AddressCacheStore, Completion, ETagJsonResponseHandler, EmptyResponseHandler, ExecutorState,
    InMemoryFailureCounter, JsonResponseHandler, RequestDescriptor, RequestExecutor, RestContext,
    StaticAddressCache, TransportRegistry, TransportStrategy, TransportSwitcher,
};
use vpnrest_domain::{header, Endpoint, Outcome, RestError, RestResponse, TransportError};

mod support;

use support::{
    authorized_context, context, factory, json, CountingTokenSource, HangingTransport,
    ScriptedTransport,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Addresses(Vec<String>);

fn fast_retries(count: u32) -> RetryStrategy {
    RetryStrategy::new(count, RetryDelay::Constant(Duration::from_millis(1)))
}

fn addrs() -> RequestDescriptor {
    RequestDescriptor::get("get-api-addrs", "/api-addrs")
}

/// A permanently failing transport is tried `n + 1` times before failing.
#[tokio::test]
async fn test_retry_exhaustion_sends_n_plus_one_times() {
    for retries in [1u32, 3, 5] {
        let transport = ScriptedTransport::always(Err(TransportError::Timeout));
        let executor = RequestExecutor::new(
            context(transport.clone()),
            factory(),
            addrs().with_retry_strategy(fast_retries(retries)),
            JsonResponseHandler::<Addresses>::new(),
        );

        let err = executor.execute().await.unwrap_err();
        assert!(matches!(err, RestError::Network(_)));
        assert_eq!(transport.sends(), retries as usize + 1);
    }
}

/// With no retries the first failure propagates immediately.
#[tokio::test]
async fn test_no_retry_sends_once_without_waiting() {
    let transport = ScriptedTransport::always(Err(TransportError::Connect("refused".into())));
    let executor = RequestExecutor::new(
        context(transport.clone()),
        factory(),
        addrs().with_retry_strategy(RetryStrategy::no_retry()),
        JsonResponseHandler::<Addresses>::new(),
    );

    let handle = executor.spawn();
    let mut states = handle.subscribe();
    let completion = handle.wait().await;

    assert!(matches!(completion, Completion::Failure(RestError::Network(_))));
    assert_eq!(transport.sends(), 1);
    assert_eq!(*states.borrow_and_update(), ExecutorState::Failed);
}

/// A transient failure followed by success yields the decoded value.
#[tokio::test]
async fn test_recovers_after_transient_failure() {
    let transport = ScriptedTransport::new(
        vec![Err(TransportError::Timeout)],
        json(200, r#"["1.2.3.4:443"]"#),
    );
    let executor = RequestExecutor::new(
        context(transport.clone()),
        factory(),
        addrs().with_retry_strategy(fast_retries(3)),
        JsonResponseHandler::<Addresses>::new(),
    );

    let outcome = executor.execute().await.unwrap();
    assert_eq!(outcome, Outcome::Value(Addresses(vec!["1.2.3.4:443".into()])));
    assert_eq!(transport.sends(), 2);
}

/// Server answers and malformed bodies are never retried.
#[tokio::test]
async fn test_server_and_decode_errors_are_not_retried() {
    let transport = ScriptedTransport::always(json(503, r#"{"code":"SERVICE_UNAVAILABLE"}"#));
    let err = RequestExecutor::new(
        context(transport.clone()),
        factory(),
        addrs().with_retry_strategy(fast_retries(3)),
        JsonResponseHandler::<Addresses>::new(),
    )
    .execute()
    .await
    .unwrap_err();
    assert_eq!(err.server_error().map(|e| e.code.as_str()), Some("SERVICE_UNAVAILABLE"));
    assert_eq!(transport.sends(), 1);

    let transport = ScriptedTransport::always(json(200, "{not json"));
    let err = RequestExecutor::new(
        context(transport.clone()),
        factory(),
        addrs().with_retry_strategy(fast_retries(3)),
        JsonResponseHandler::<Addresses>::new(),
    )
    .execute()
    .await
    .unwrap_err();
    assert!(matches!(err, RestError::DecodeResponse(_)));
    assert_eq!(transport.sends(), 1);
}

/// Without a registered transport the request fails fast.
#[tokio::test]
async fn test_missing_transport_fails_fast() {
    let context = RestContext::new(
        Arc::new(TransportRegistry::new()),
        Arc::new(StaticAddressCache::new(support::endpoint())),
    );
    let err = RequestExecutor::new(
        context,
        factory(),
        addrs().with_retry_strategy(fast_retries(3)),
        JsonResponseHandler::<Addresses>::new(),
    )
    .execute()
    .await
    .unwrap_err();
    assert_eq!(err, RestError::NoTransport);
}

/// An invalid access token triggers exactly one re-authorization.
#[tokio::test]
async fn test_invalid_token_reauthorizes_once() {
    let invalid = json(401, r#"{"code":"INVALID_ACCESS_TOKEN","detail":"expired"}"#);
    let transport = ScriptedTransport::new(vec![invalid], Ok(RestResponse::new(204, Vec::new())));
    let source = CountingTokenSource::new(Duration::ZERO);
    let (context, _tokens) = authorized_context(transport.clone(), source.clone());

    let descriptor = RequestDescriptor::delete("remove-device", "/devices/1").with_account("1234");
    let outcome = RequestExecutor::new(context, factory(), descriptor, EmptyResponseHandler::any_success())
        .execute()
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Value(()));
    assert_eq!(source.calls(), 2);

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].header(header::AUTHORIZATION), Some("Bearer token-1234-0"));
    assert_eq!(requests[1].header(header::AUTHORIZATION), Some("Bearer token-1234-1"));
}

/// A second invalid-token answer is surfaced instead of looping.
#[tokio::test]
async fn test_invalid_token_twice_fails() {
    let invalid = json(401, r#"{"code":"INVALID_ACCESS_TOKEN"}"#);
    let transport = ScriptedTransport::always(invalid);
    let source = CountingTokenSource::new(Duration::ZERO);
    let (context, _tokens) = authorized_context(transport.clone(), source.clone());

    let descriptor = RequestDescriptor::get("me", "/accounts/me").with_account("1234");
    let err = RequestExecutor::new(context, factory(), descriptor, EmptyResponseHandler::any_success())
        .execute()
        .await
        .unwrap_err();

    assert!(err.is_invalid_access_token());
    assert_eq!(transport.sends(), 2);
    assert_eq!(source.calls(), 2);
}

/// Ten concurrent authorized requests share one authentication call.
#[tokio::test]
async fn test_concurrent_requests_share_one_token_refresh() {
    let transport = ScriptedTransport::always(Ok(RestResponse::new(204, Vec::new())));
    let source = CountingTokenSource::new(Duration::from_millis(50));
    let (context, _tokens) = authorized_context(transport.clone(), source.clone());

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let descriptor =
                RequestDescriptor::get(format!("call-{i}"), "/accounts/me").with_account("1234");
            RequestExecutor::new(
                context.clone(),
                factory(),
                descriptor,
                EmptyResponseHandler::any_success(),
            )
            .spawn()
        })
        .collect();

    for handle in handles {
        assert!(handle.result().await.is_ok());
    }

    assert_eq!(source.calls(), 1);
    assert_eq!(transport.sends(), 10);
}

/// 304 to a conditional request is NotModified and nothing is decoded.
#[tokio::test]
async fn test_not_modified_with_etag() {
    let transport = ScriptedTransport::always(Ok(RestResponse::new(304, Vec::new())));
    let descriptor = RequestDescriptor::get("get-relays", "/relays")
        .with_etag(Some("\"abc\"".to_string()));

    let outcome = RequestExecutor::new(
        context(transport.clone()),
        factory(),
        descriptor,
        ETagJsonResponseHandler::<serde_json::Value>::new(),
    )
    .execute()
    .await
    .unwrap();

    assert!(outcome.is_not_modified());
    let sent = transport.requests();
    assert_eq!(sent[0].header(header::IF_NONE_MATCH), Some("W/\"abc\""));
}

/// Cancelling twice, or after completion, has no further effect.
#[tokio::test]
async fn test_cancellation_is_idempotent() {
    let transport = Arc::new(HangingTransport::default());
    let handle = RequestExecutor::new(
        context(transport.clone()),
        factory(),
        addrs(),
        JsonResponseHandler::<Addresses>::new(),
    )
    .spawn();

    let mut states = handle.subscribe();
    states.wait_for(|state| matches!(state, ExecutorState::Sending { .. })).await.unwrap();

    handle.cancel();
    handle.cancel();

    let token = handle.cancellation_token();
    let completion = handle.wait().await;
    assert_eq!(completion, Completion::Cancelled);
    assert_eq!(transport.sends.load(Ordering::SeqCst), 1);

    token.cancel();
    assert_eq!(*states.borrow(), ExecutorState::Cancelled);
}

/// Cancelling a finished request does not change its completion.
#[tokio::test]
async fn test_cancel_after_success_is_a_no_op() {
    let transport = ScriptedTransport::always(Ok(RestResponse::new(204, Vec::new())));
    let handle = RequestExecutor::new(
        context(transport),
        factory(),
        addrs(),
        EmptyResponseHandler::any_success(),
    )
    .spawn();

    let mut states = handle.subscribe();
    states.wait_for(ExecutorState::is_terminal).await.unwrap();
    handle.cancel();

    assert_eq!(handle.wait().await, Completion::Success(Outcome::Value(())));
}

/// Cancellation during a backoff wait ends the request without another send.
#[tokio::test]
async fn test_cancel_during_backoff() {
    let transport = ScriptedTransport::always(Err(TransportError::Timeout));
    let handle = RequestExecutor::new(
        context(transport.clone()),
        factory(),
        addrs().with_retry_strategy(RetryStrategy::new(
            3,
            RetryDelay::Constant(Duration::from_secs(3600)),
        )),
        JsonResponseHandler::<Addresses>::new(),
    )
    .spawn();

    let mut states = handle.subscribe();
    states.wait_for(|state| matches!(state, ExecutorState::Retrying { .. })).await.unwrap();
    handle.cancel();

    assert!(handle.wait().await.is_cancelled());
    assert_eq!(transport.sends(), 1);
}

/// Connection failures seen through the switcher move traffic to the
/// obfuscated transport, with a direct probe every third attempt.
#[tokio::test]
async fn test_switcher_escalation_through_executor() {
    let direct = ScriptedTransport::always(Err(TransportError::Timeout));
    let obfuscated = ScriptedTransport::new(
        vec![Err(TransportError::Connect("bridge down".into()))],
        json(200, r#"["1.2.3.4:443"]"#),
    );
    let strategy = Arc::new(TransportStrategy::new(Arc::new(InMemoryFailureCounter::default())));
    let switcher = Arc::new(TransportSwitcher::new(
        direct.clone(),
        Some(obfuscated.clone()),
        Arc::clone(&strategy),
    ));

    let outcome = RequestExecutor::new(
        context(switcher),
        factory(),
        addrs().with_retry_strategy(fast_retries(5)),
        JsonResponseHandler::<Addresses>::new(),
    )
    .execute()
    .await
    .unwrap();

    // direct (0) fails -> obfuscated (1) fails -> obfuscated (2) succeeds
    assert!(matches!(outcome, Outcome::Value(_)));
    assert_eq!(direct.sends(), 1);
    assert_eq!(obfuscated.sends(), 2);
    assert_eq!(strategy.failure_count(), 2);
}

/// A request whose token is already cancelled never authorizes or sends.
#[tokio::test]
async fn test_cancelled_before_start_has_no_side_effects() {
    let transport = ScriptedTransport::always(Ok(RestResponse::new(204, Vec::new())));
    let source = CountingTokenSource::new(Duration::ZERO);
    let (context, _tokens) = authorized_context(transport.clone(), source.clone());

    let cancel = CancellationToken::new();
    cancel.cancel();

    let descriptor = RequestDescriptor::get("me", "/accounts/me").with_account("1234");
    let handle = RequestExecutor::new(context, factory(), descriptor, EmptyResponseHandler::any_success())
        .spawn_with_token(cancel);
    let mut states = handle.subscribe();

    assert_eq!(handle.wait().await, Completion::Cancelled);
    assert_eq!(*states.borrow_and_update(), ExecutorState::Cancelled);
    assert_eq!(source.calls(), 0);
    assert_eq!(transport.sends(), 0);
}

/// A retry re-reads the address cache and targets the new endpoint.
#[tokio::test]
async fn test_retry_uses_refreshed_endpoint() {
    let transport = ScriptedTransport::new(
        vec![Err(TransportError::Connect("refused".into()))],
        json(200, r#"["1.2.3.4:443"]"#),
    );
    let address_cache = Arc::new(StaticAddressCache::new(support::endpoint()));
    let context = RestContext::new(
        Arc::new(TransportRegistry::with_transport(transport.clone())),
        address_cache.clone(),
    );

    let handle = RequestExecutor::new(
        context,
        factory(),
        addrs().with_retry_strategy(RetryStrategy::new(
            1,
            RetryDelay::Constant(Duration::from_millis(300)),
        )),
        JsonResponseHandler::<Addresses>::new(),
    )
    .spawn();

    let mut states = handle.subscribe();
    states.wait_for(|state| matches!(state, ExecutorState::Retrying { .. })).await.unwrap();

    let refreshed: Endpoint = "185.65.135.1:443".parse().unwrap();
    address_cache.set_endpoints(&[refreshed]);

    let outcome = handle.result().await.unwrap();
    assert_eq!(outcome, Outcome::Value(Addresses(vec!["1.2.3.4:443".into()])));

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].endpoint, support::endpoint());
    assert_eq!(requests[1].endpoint, refreshed);
}
