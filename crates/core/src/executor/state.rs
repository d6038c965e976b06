//! Observable executor states and the final completion value

use std::time::Duration;

use vpnrest_domain::{Outcome, RestError, Result};

/// Where an executor currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    Start,
    AwaitingAuthorization,
    BuildingRequest,
    /// `attempt` starts at 1 for every freshly built request
    Sending { attempt: u32 },
    InterpretingResponse,
    Retrying { attempt: u32, delay: Duration },
    Succeeded,
    Failed,
    Cancelled,
}

impl ExecutorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

/// Final result of an executor, delivered exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    Success(Outcome<T>),
    Failure(RestError),
    Cancelled,
}

impl<T> Completion<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Collapse into a plain result; cancellation becomes [`RestError::Cancelled`]
    pub fn into_result(self) -> Result<Outcome<T>> {
        match self {
            Self::Success(outcome) => Ok(outcome),
            Self::Failure(error) => Err(error),
            Self::Cancelled => Err(RestError::Cancelled),
        }
    }
}

impl<T> From<Result<Outcome<T>>> for Completion<T> {
    fn from(result: Result<Outcome<T>>) -> Self {
        match result {
            Ok(outcome) => Self::Success(outcome),
            Err(error) if error.is_cancellation() => Self::Cancelled,
            Err(error) => Self::Failure(error),
        }
    }
}
