//! Request executor state machine

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;
use vpnrest_domain::{Outcome, RestError, RestRequest, RestResponse, Result, TransportError};

use super::handle::ExecutorHandle;
use super::state::{Completion, ExecutorState};
use crate::access_token::ports::AuthorizationProvider;
use crate::address_cache_ports::AddressCacheStore;
use crate::request::{HandlerResult, RequestDescriptor, RequestFactory, ResponseHandler};
use crate::transport::TransportRegistry;

/// Collaborators shared by every request of a client
#[derive(Clone)]
pub struct RestContext {
    pub registry: Arc<TransportRegistry>,
    pub address_cache: Arc<dyn AddressCacheStore>,
    pub authorization: Option<Arc<dyn AuthorizationProvider>>,
}

impl RestContext {
    pub fn new(registry: Arc<TransportRegistry>, address_cache: Arc<dyn AddressCacheStore>) -> Self {
        Self { registry, address_cache, authorization: None }
    }

    pub fn with_authorization(mut self, authorization: Arc<dyn AuthorizationProvider>) -> Self {
        self.authorization = Some(authorization);
        self
    }
}

impl std::fmt::Debug for RestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestContext")
            .field("registry", &self.registry)
            .field("authorization", &self.authorization.is_some())
            .finish_non_exhaustive()
    }
}

/// One API call: descriptor, response handler and the collaborators needed
/// to get it across.
pub struct RequestExecutor<H: ResponseHandler> {
    context: RestContext,
    factory: RequestFactory,
    descriptor: RequestDescriptor,
    handler: H,
}

impl<H: ResponseHandler> RequestExecutor<H> {
    pub fn new(
        context: RestContext,
        factory: RequestFactory,
        descriptor: RequestDescriptor,
        handler: H,
    ) -> Self {
        Self { context, factory, descriptor, handler }
    }

    /// Start the request on its own task
    pub fn spawn(self) -> ExecutorHandle<H::Output> {
        self.spawn_with_token(CancellationToken::new())
    }

    /// Start the request, cancelled together with `cancel`
    pub fn spawn_with_token(self, cancel: CancellationToken) -> ExecutorHandle<H::Output> {
        let id = Uuid::new_v4();
        let (state_tx, state_rx) = watch::channel(ExecutorState::Start);
        let span = info_span!("rest_request", request = %self.descriptor.name, request_id = %id);

        let token = cancel.clone();
        let task = tokio::spawn(async move { self.run(token, state_tx).await }.instrument(span));

        ExecutorHandle::new(id, cancel, state_rx, task)
    }

    /// Run to completion and return the plain result
    pub async fn execute(self) -> Result<Outcome<H::Output>> {
        self.spawn().result().await
    }

    async fn run(
        self,
        cancel: CancellationToken,
        state: watch::Sender<ExecutorState>,
    ) -> Completion<H::Output> {
        let completion = tokio::select! {
            biased;
            () = cancel.cancelled() => Completion::Cancelled,
            result = self.drive(&state) => Completion::from(result),
        };

        let final_state = match &completion {
            Completion::Success(_) => {
                debug!("executor.succeeded");
                ExecutorState::Succeeded
            }
            Completion::Failure(error) => {
                warn!(error = %error, category = %error.category(), "executor.failed");
                ExecutorState::Failed
            }
            Completion::Cancelled => {
                debug!("executor.cancelled");
                ExecutorState::Cancelled
            }
        };
        state.send_replace(final_state);
        completion
    }

    /// Each pass starts over from authorization so that a retry picks up a
    /// refreshed token and whatever endpoint the address cache holds now.
    async fn drive(&self, state: &watch::Sender<ExecutorState>) -> Result<Outcome<H::Output>> {
        let mut delays = self.descriptor.retry_strategy.delays();
        let mut has_retried_auth_once = false;
        let mut attempt = 0u32;

        loop {
            state.send_replace(ExecutorState::Start);

            let access_token = match &self.descriptor.account {
                Some(account) => {
                    state.send_replace(ExecutorState::AwaitingAuthorization);
                    Some(self.authorize(account).await?)
                }
                None => None,
            };

            state.send_replace(ExecutorState::BuildingRequest);
            let endpoint = self.context.address_cache.current_endpoint();
            let request = self.factory.build(&self.descriptor, endpoint, access_token.as_deref())?;

            attempt = attempt.saturating_add(1);
            state.send_replace(ExecutorState::Sending { attempt });

            let error = match self.send(&request).await? {
                Ok(response) => {
                    state.send_replace(ExecutorState::InterpretingResponse);
                    let status = response.status;
                    match self.handler.handle(&request, response) {
                        HandlerResult::Success(value) => return Ok(Outcome::Value(value)),
                        HandlerResult::Decode(decode) => return decode().map(Outcome::Value),
                        HandlerResult::NotModified => return Ok(Outcome::NotModified),
                        HandlerResult::Unhandled(server_error) => {
                            let error = RestError::Unhandled { status, server_error };
                            if access_token.is_some()
                                && !has_retried_auth_once
                                && error.is_invalid_access_token()
                            {
                                has_retried_auth_once = true;
                                self.invalidate_token();
                                info!(status, "executor.reauthorizing");
                                continue;
                            }
                            return Err(error);
                        }
                    }
                }
                Err(error) => error,
            };

            match delays.next() {
                Some(delay) => {
                    state.send_replace(ExecutorState::Retrying { attempt, delay });
                    warn!(
                        error = %error,
                        attempt,
                        %endpoint,
                        delay_ms = delay.as_millis() as u64,
                        "executor.retry_scheduled"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => return Err(error),
            }
        }
    }

    /// Outer error stops the executor, inner error is eligible for retry
    async fn send(
        &self,
        request: &RestRequest,
    ) -> Result<std::result::Result<RestResponse, RestError>> {
        let transport = self.context.registry.require()?;
        debug!(transport = transport.name(), url = %request.url, "executor.sending");

        match transport.send(request.clone()).await {
            Ok(response) => Ok(Ok(response)),
            Err(TransportError::Cancelled) => Err(RestError::Cancelled),
            Err(err) => Ok(Err(RestError::from(err))),
        }
    }

    async fn authorize(&self, account: &str) -> Result<String> {
        let provider = self.context.authorization.as_ref().ok_or_else(|| {
            RestError::Internal("request requires authorization but no provider is set".into())
        })?;
        provider.authorization(account).await.map_err(RestError::authorization)
    }

    fn invalidate_token(&self) {
        if let (Some(provider), Some(account)) =
            (&self.context.authorization, &self.descriptor.account)
        {
            provider.invalidate(account);
        }
    }
}
