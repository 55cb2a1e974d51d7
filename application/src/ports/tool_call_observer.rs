//! Tool call observer port
//!
//! Callbacks the scheduler drives as a batch progresses. Implementations
//! live in the presentation layer (console renderer) or in the agent loop.

use conductor_domain::{CompletedToolCall, ToolCall};

/// Receives scheduler state changes
///
/// Both methods default to no-ops. They are called outside the scheduler's
/// lock, so an implementation may call back into the scheduler.
pub trait ToolCallObserver: Send + Sync {
    /// Called after every transition with the full batch, in request order.
    fn on_tool_calls_update(&self, _calls: &[ToolCall]) {}

    /// Called exactly once per batch when every call is terminal.
    fn on_all_tool_calls_complete(&self, _completed: &[CompletedToolCall]) {}
}

/// No-op observer for callers that only await the completion handle
pub struct NoToolCallObserver;

impl ToolCallObserver for NoToolCallObserver {}
