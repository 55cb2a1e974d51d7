//! Types returned by the tool scheduler.

use conductor_domain::{BatchId, CompletedToolCall, DomainError};
use thiserror::Error;
use tokio::sync::oneshot;

/// Reason recorded when a human answers a confirmation with `Cancel`.
pub const USER_DECLINED_REASON: &str = "User did not allow tool call";

/// Reason recorded when a call notices the batch token fired without an
/// explicit `cancel(reason)` (e.g. a cancelled parent token).
pub const SIGNAL_CANCELLED_REASON: &str = "Tool call cancelled by cancellation signal";

/// Scheduler misuse errors
///
/// These are caller bugs, never per-call outcomes. A failed or cancelled
/// tool call is reported through its `ToolResponse` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Cannot schedule new tool calls while {active} call(s) of the current batch are in flight")]
    BatchInFlight { active: usize },

    #[error("A batch must contain at least one tool call")]
    EmptyBatch,

    #[error("Duplicate call id in batch: {0}")]
    DuplicateCallId(String),

    #[error("No confirmation is pending for call {0}")]
    NoPendingConfirmation(String),

    #[error("Scheduler shut down before the batch completed")]
    Closed,
}

impl From<DomainError> for SchedulerError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::EmptyBatch => SchedulerError::EmptyBatch,
            DomainError::DuplicateCallId(id) => SchedulerError::DuplicateCallId(id),
        }
    }
}

/// Handle to the aggregated result of one `schedule()` call.
#[derive(Debug)]
pub struct BatchCompletion {
    batch_id: BatchId,
    rx: oneshot::Receiver<Vec<CompletedToolCall>>,
}

impl BatchCompletion {
    pub(super) fn new(batch_id: BatchId, rx: oneshot::Receiver<Vec<CompletedToolCall>>) -> Self {
        Self { batch_id, rx }
    }

    pub fn batch_id(&self) -> BatchId {
        self.batch_id
    }

    /// Wait for every call to reach a terminal state.
    ///
    /// Results are in request order.
    pub async fn wait(self) -> Result<Vec<CompletedToolCall>, SchedulerError> {
        self.rx.await.map_err(|_| SchedulerError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_conversion() {
        assert_eq!(
            SchedulerError::from(DomainError::DuplicateCallId("7".into())),
            SchedulerError::DuplicateCallId("7".into())
        );
        assert_eq!(
            SchedulerError::from(DomainError::EmptyBatch),
            SchedulerError::EmptyBatch
        );
    }

    #[test]
    fn test_in_flight_message() {
        let err = SchedulerError::BatchInFlight { active: 2 };
        assert!(err.to_string().contains("2 call(s)"));
    }

    #[tokio::test]
    async fn test_wait_reports_closed_when_sender_dropped() {
        let (tx, rx) = oneshot::channel();
        let completion = BatchCompletion::new(BatchId(3), rx);
        drop(tx);
        assert_eq!(completion.batch_id(), BatchId(3));
        assert_eq!(completion.wait().await.unwrap_err(), SchedulerError::Closed);
    }
}
