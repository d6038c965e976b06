//! Per-request execution pipeline
//!
//! Every call runs as its own tokio task driving a small state machine:
//!
//! ```text
//! Start -> AwaitingAuthorization -> BuildingRequest -> Sending -> InterpretingResponse
//!   ^                                                       |             |
//!   +----------------------- Retrying <---------------------+-------------+--> Succeeded | Failed
//! ```
//!
//! A retry goes back to `Start`: the token is fetched again (normally a
//! cache hit) and the endpoint is re-read from the address cache.
//!
//! Cancellation is possible from every state and ends in `Cancelled`.

pub mod handle;
pub mod runner;
pub mod state;

pub use handle::ExecutorHandle;
pub use runner::{RequestExecutor, RestContext};
pub use state::{Completion, ExecutorState};
