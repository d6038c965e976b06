//! Caller side of a running executor

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use vpnrest_domain::{Outcome, RestError, Result};

use super::state::{Completion, ExecutorState};

/// Handle to a spawned request
///
/// Dropping the handle does not cancel the request.
#[derive(Debug)]
pub struct ExecutorHandle<T> {
    id: Uuid,
    cancel: CancellationToken,
    state: watch::Receiver<ExecutorState>,
    task: JoinHandle<Completion<T>>,
}

impl<T> ExecutorHandle<T> {
    pub(crate) fn new(
        id: Uuid,
        cancel: CancellationToken,
        state: watch::Receiver<ExecutorState>,
        task: JoinHandle<Completion<T>>,
    ) -> Self {
        Self { id, cancel, state, task }
    }

    /// Request id, also recorded on the executor's tracing span
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Cancel the request; a no-op once it has finished or was cancelled
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this request when triggered
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> ExecutorState {
        *self.state.borrow()
    }

    /// Receiver for state transitions
    pub fn subscribe(&self) -> watch::Receiver<ExecutorState> {
        self.state.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the completion
    pub async fn wait(self) -> Completion<T> {
        match self.task.await {
            Ok(completion) => completion,
            Err(err) if err.is_cancelled() => Completion::Cancelled,
            Err(err) => Completion::Failure(RestError::Internal(format!("executor task failed: {err}"))),
        }
    }

    /// Wait for the completion as a plain result
    pub async fn result(self) -> Result<Outcome<T>> {
        self.wait().await.into_result()
    }
}
