//! Batch aggregate and its transition reducer.
//!
//! A [`Batch`] is the set of tool calls submitted by one `schedule()`
//! invocation. Calls are stored keyed by [`CallId`] with a separate order
//! vector, so lookups are O(1) and completion lists keep request order.
//!
//! [`Batch::apply`] is the only way to change a batch: it consumes the old
//! snapshot and a [`Transition`] and returns the new snapshot plus whether
//! anything changed. Transitions that are not valid for a call's current
//! state are ignored.

use crate::core::error::DomainError;
use crate::scheduling::tool_call::{CompletedToolCall, ToolCall, ToolCallStatus};
use crate::tool::{
    confirmation::ConfirmationDetails,
    entities::CallId,
    value_objects::{ToolError, ToolExecutionResult},
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Generation number of a batch within one scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BatchId(pub u64);

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "batch-{}", self.0)
    }
}

/// A state change requested for one call, or for the whole batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Validating → AwaitingApproval
    AwaitApproval {
        call_id: CallId,
        confirmation: ConfirmationDetails,
    },
    /// Validating | AwaitingApproval → Scheduled
    Schedule { call_id: CallId },
    /// Every Scheduled call → Executing, only once no call is still
    /// Validating or AwaitingApproval.
    StartExecution,
    /// Record partial output of an Executing call
    UpdateOutput { call_id: CallId, output: String },
    /// Executing → Success
    Succeed {
        call_id: CallId,
        result: ToolExecutionResult,
    },
    /// Any non-terminal → Error
    Fail { call_id: CallId, error: ToolError },
    /// Any non-terminal → Cancelled
    Cancel { call_id: CallId, reason: String },
    /// Every non-terminal call → Cancelled
    CancelAll { reason: String },
}

/// Tool calls submitted together.
#[derive(Debug, Clone)]
pub struct Batch {
    id: BatchId,
    order: Vec<CallId>,
    calls: HashMap<CallId, ToolCall>,
}

impl Batch {
    /// Build a batch; call ids must be unique and the batch non-empty.
    pub fn new(id: BatchId, calls: Vec<ToolCall>) -> Result<Self, DomainError> {
        if calls.is_empty() {
            return Err(DomainError::EmptyBatch);
        }

        let mut order = Vec::with_capacity(calls.len());
        let mut map = HashMap::with_capacity(calls.len());
        for call in calls {
            let call_id = call.call_id().clone();
            if map.contains_key(&call_id) {
                return Err(DomainError::DuplicateCallId(call_id.to_string()));
            }
            order.push(call_id.clone());
            map.insert(call_id, call);
        }

        Ok(Self {
            id,
            order,
            calls: map,
        })
    }

    /// Reject duplicate ids before any tool is resolved.
    pub fn check_unique<'a>(ids: impl IntoIterator<Item = &'a CallId>) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                return Err(DomainError::DuplicateCallId(id.to_string()));
            }
        }
        Ok(())
    }

    pub fn id(&self) -> BatchId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, call_id: &CallId) -> Option<&ToolCall> {
        self.calls.get(call_id)
    }

    /// Calls in request order.
    pub fn calls(&self) -> impl Iterator<Item = &ToolCall> {
        self.order.iter().filter_map(|id| self.calls.get(id))
    }

    /// Owned copy of every call, in request order.
    pub fn snapshot(&self) -> Vec<ToolCall> {
        self.calls().cloned().collect()
    }

    /// Ids of calls currently in `status`, in request order.
    pub fn ids_with_status(&self, status: ToolCallStatus) -> Vec<CallId> {
        self.calls()
            .filter(|c| c.status() == status)
            .map(|c| c.call_id().clone())
            .collect()
    }

    /// Every call is terminal.
    pub fn is_complete(&self) -> bool {
        !self.is_empty() && self.calls.values().all(|c| c.is_terminal())
    }

    /// At least one call is still moving.
    pub fn is_in_flight(&self) -> bool {
        self.calls.values().any(|c| !c.is_terminal())
    }

    /// At least one call is Scheduled and none is still Validating or
    /// AwaitingApproval.
    pub fn ready_to_execute(&self) -> bool {
        let mut any_scheduled = false;
        for call in self.calls.values() {
            match call.status() {
                ToolCallStatus::Validating | ToolCallStatus::AwaitingApproval => return false,
                ToolCallStatus::Scheduled => any_scheduled = true,
                _ => {}
            }
        }
        any_scheduled
    }

    /// Apply one transition, returning the new batch and whether it changed.
    pub fn apply(mut self, transition: Transition, now: u64) -> (Self, bool) {
        let changed = match transition {
            Transition::AwaitApproval {
                call_id,
                confirmation,
            } => self
                .calls
                .get_mut(&call_id)
                .is_some_and(|c| c.await_approval(confirmation)),
            Transition::Schedule { call_id } => {
                self.calls.get_mut(&call_id).is_some_and(|c| c.schedule())
            }
            Transition::StartExecution => {
                if self.ready_to_execute() {
                    let mut started = false;
                    for call in self.calls.values_mut() {
                        started |= call.start(now);
                    }
                    started
                } else {
                    false
                }
            }
            Transition::UpdateOutput { call_id, output } => self
                .calls
                .get_mut(&call_id)
                .is_some_and(|c| c.update_output(output)),
            Transition::Succeed { call_id, result } => self
                .calls
                .get_mut(&call_id)
                .is_some_and(|c| c.succeed(result, now)),
            Transition::Fail { call_id, error } => self
                .calls
                .get_mut(&call_id)
                .is_some_and(|c| c.fail(error, now)),
            Transition::Cancel { call_id, reason } => self
                .calls
                .get_mut(&call_id)
                .is_some_and(|c| c.cancel(&reason, now)),
            Transition::CancelAll { reason } => {
                let mut cancelled = false;
                for call in self.calls.values_mut() {
                    cancelled |= call.cancel(&reason, now);
                }
                cancelled
            }
        };
        (self, changed)
    }

    /// Terminal views of every call, in request order.
    ///
    /// Calls still in flight are skipped; callers check
    /// [`is_complete`](Self::is_complete) first.
    pub fn completed(&self) -> Vec<CompletedToolCall> {
        self.calls().filter_map(|c| c.to_completed()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::tool_call::CallOutcome;
    use crate::tool::entities::{ToolCallRequest, ToolInfo};

    fn call(id: &str, name: &str) -> ToolCall {
        ToolCall::validating(
            ToolCallRequest::new(id, name),
            ToolInfo::new(name, name),
            0,
        )
    }

    fn batch(calls: Vec<ToolCall>) -> Batch {
        Batch::new(BatchId(1), calls).unwrap()
    }

    fn apply(batch: Batch, transition: Transition) -> Batch {
        batch.apply(transition, 10).0
    }

    fn schedule(id: &str) -> Transition {
        Transition::Schedule {
            call_id: CallId::new(id),
        }
    }

    fn confirmation() -> ConfirmationDetails {
        ConfirmationDetails::Info {
            title: "Confirm".to_string(),
            prompt: "delete it?".to_string(),
        }
    }

    #[test]
    fn test_new_rejects_duplicates_and_empty() {
        assert_eq!(
            Batch::new(BatchId(1), vec![call("1", "a"), call("1", "b")]).unwrap_err(),
            DomainError::DuplicateCallId("1".to_string())
        );
        assert_eq!(
            Batch::new(BatchId(1), vec![]).unwrap_err(),
            DomainError::EmptyBatch
        );
    }

    #[test]
    fn test_check_unique() {
        let ids = [CallId::new("a"), CallId::new("b"), CallId::new("a")];
        assert!(Batch::check_unique(&ids[..2]).is_ok());
        assert!(Batch::check_unique(&ids).is_err());
    }

    #[test]
    fn test_execution_gated_on_pending_approval() {
        let b = batch(vec![call("echo", "echo"), call("del", "delete_file")]);
        let b = apply(b, schedule("echo"));
        let b = apply(
            b,
            Transition::AwaitApproval {
                call_id: CallId::new("del"),
                confirmation: confirmation(),
            },
        );
        assert!(!b.ready_to_execute());

        let (b, changed) = b.apply(Transition::StartExecution, 10);
        assert!(!changed);
        assert_eq!(b.get(&CallId::new("echo")).unwrap().status(), ToolCallStatus::Scheduled);

        let b = apply(b, schedule("del"));
        assert!(b.ready_to_execute());
        let (b, changed) = b.apply(Transition::StartExecution, 10);
        assert!(changed);
        assert_eq!(b.ids_with_status(ToolCallStatus::Executing).len(), 2);
    }

    #[test]
    fn test_start_execution_fires_once_per_call() {
        let b = apply(batch(vec![call("1", "a")]), schedule("1"));
        let (b, first) = b.apply(Transition::StartExecution, 10);
        let (b, second) = b.apply(Transition::StartExecution, 11);
        assert!(first);
        assert!(!second);
        assert_eq!(b.get(&CallId::new("1")).unwrap().status(), ToolCallStatus::Executing);
    }

    #[test]
    fn test_cancelled_sibling_does_not_block_execution() {
        let b = batch(vec![call("1", "a"), call("2", "b")]);
        let b = apply(b, schedule("1"));
        let b = apply(
            b,
            Transition::Cancel {
                call_id: CallId::new("2"),
                reason: "User did not allow tool call".to_string(),
            },
        );
        assert!(b.ready_to_execute());
    }

    #[test]
    fn test_only_errors_is_complete_without_execution() {
        let b = batch(vec![ToolCall::unknown_tool(ToolCallRequest::new("1", "nope"), 0)]);
        assert!(b.is_complete());
        assert!(!b.is_in_flight());
        assert!(!b.ready_to_execute());
    }

    #[test]
    fn test_cancel_all_spares_terminal_calls() {
        let b = batch(vec![call("1", "a"), call("2", "b"), call("3", "c")]);
        let b = apply(
            b,
            Transition::Fail {
                call_id: CallId::new("1"),
                error: ToolError::execution_failed("boom"),
            },
        );
        let b = apply(b, schedule("2"));
        let b = apply(b, schedule("3"));
        let b = apply(b, Transition::StartExecution);
        let b = apply(
            b,
            Transition::Succeed {
                call_id: CallId::new("3"),
                result: ToolExecutionResult::new("ok"),
            },
        );
        let b = apply(
            b,
            Transition::CancelAll {
                reason: "user pressed escape".to_string(),
            },
        );

        assert!(b.is_complete());
        let outcomes: Vec<_> = b.completed().iter().map(|c| c.outcome).collect();
        assert_eq!(
            outcomes,
            vec![CallOutcome::Error, CallOutcome::Cancelled, CallOutcome::Success]
        );
        let cancelled = b.completed().into_iter().nth(1).unwrap();
        assert!(cancelled.message().unwrap().contains("user pressed escape"));
    }

    #[test]
    fn test_completed_preserves_request_order() {
        let ids = ["z", "a", "m", "b"];
        let b = batch(ids.iter().map(|id| call(id, "t")).collect());
        let b = ids.iter().fold(b, |b, id| apply(b, schedule(id)));
        let b = apply(b, Transition::StartExecution);
        // finish in reverse
        let b = ids.iter().rev().fold(b, |b, id| {
            apply(
                b,
                Transition::Succeed {
                    call_id: CallId::new(*id),
                    result: ToolExecutionResult::new(*id),
                },
            )
        });

        let order: Vec<_> = b.completed().iter().map(|c| c.call_id().to_string()).collect();
        assert_eq!(order, vec!["z", "a", "m", "b"]);
    }

    #[test]
    fn test_unknown_call_id_is_ignored() {
        let (_, changed) = batch(vec![call("1", "a")]).apply(schedule("missing"), 0);
        assert!(!changed);
    }
}
