//! Tool call state machine.
//!
//! Each [`ToolCall`] wraps a [`ToolCallState`] enum where every variant
//! carries only the payload valid for that state. Transition helpers are
//! no-ops when invoked from a state that does not allow them, so a late
//! event (a confirmation arriving after cancellation, a result arriving
//! after an error) can never resurrect a terminal call.

use crate::tool::{
    confirmation::ConfirmationDetails,
    entities::{CallId, ToolCallRequest, ToolInfo},
    value_objects::{ToolError, ToolExecutionResult, ToolResponse},
};
use serde::{Deserialize, Serialize};

/// Discriminant of [`ToolCallState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallStatus {
    Validating,
    AwaitingApproval,
    Scheduled,
    Executing,
    Success,
    Error,
    Cancelled,
}

impl ToolCallStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::AwaitingApproval => "awaiting_approval",
            Self::Scheduled => "scheduled",
            Self::Executing => "executing",
            Self::Success => "success",
            Self::Error => "error",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ToolCallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolCallState {
    /// Tool resolved; parameters and confirmation are being checked.
    Validating { tool: ToolInfo },
    /// Waiting for a human decision.
    AwaitingApproval {
        tool: ToolInfo,
        confirmation: ConfirmationDetails,
    },
    /// Cleared to run once the whole batch is ready.
    Scheduled { tool: ToolInfo },
    /// `execute` is running.
    Executing {
        tool: ToolInfo,
        started_at: u64,
        live_output: Option<String>,
    },
    Success {
        tool: ToolInfo,
        response: ToolResponse,
        duration_ms: u64,
    },
    Error {
        tool: Option<ToolInfo>,
        response: ToolResponse,
        duration_ms: u64,
    },
    Cancelled {
        tool: Option<ToolInfo>,
        response: ToolResponse,
        duration_ms: u64,
    },
}

impl ToolCallState {
    pub fn status(&self) -> ToolCallStatus {
        match self {
            Self::Validating { .. } => ToolCallStatus::Validating,
            Self::AwaitingApproval { .. } => ToolCallStatus::AwaitingApproval,
            Self::Scheduled { .. } => ToolCallStatus::Scheduled,
            Self::Executing { .. } => ToolCallStatus::Executing,
            Self::Success { .. } => ToolCallStatus::Success,
            Self::Error { .. } => ToolCallStatus::Error,
            Self::Cancelled { .. } => ToolCallStatus::Cancelled,
        }
    }

    /// The resolved tool, if the call got that far.
    pub fn tool(&self) -> Option<&ToolInfo> {
        match self {
            Self::Validating { tool }
            | Self::AwaitingApproval { tool, .. }
            | Self::Scheduled { tool }
            | Self::Executing { tool, .. }
            | Self::Success { tool, .. } => Some(tool),
            Self::Error { tool, .. } | Self::Cancelled { tool, .. } => tool.as_ref(),
        }
    }

    pub fn response(&self) -> Option<&ToolResponse> {
        match self {
            Self::Success { response, .. }
            | Self::Error { response, .. }
            | Self::Cancelled { response, .. } => Some(response),
            _ => None,
        }
    }
}

/// A single tool call tracked within a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub request: ToolCallRequest,
    pub state: ToolCallState,
    /// Milliseconds since the epoch at which the call entered the batch.
    pub created_at: u64,
}

impl ToolCall {
    /// A call whose tool resolved; starts in Validating.
    pub fn validating(request: ToolCallRequest, tool: ToolInfo, now: u64) -> Self {
        Self {
            request,
            state: ToolCallState::Validating { tool },
            created_at: now,
        }
    }

    /// A call whose tool name is not registered; born terminal.
    pub fn unknown_tool(request: ToolCallRequest, now: u64) -> Self {
        let error = ToolError::unknown_tool(&request.name);
        let response = ToolResponse::failure(&request.call_id, &request.name, error);
        Self {
            request,
            state: ToolCallState::Error {
                tool: None,
                response,
                duration_ms: 0,
            },
            created_at: now,
        }
    }

    pub fn call_id(&self) -> &CallId {
        &self.request.call_id
    }

    pub fn status(&self) -> ToolCallStatus {
        self.state.status()
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    pub fn tool(&self) -> Option<&ToolInfo> {
        self.state.tool()
    }

    pub fn response(&self) -> Option<&ToolResponse> {
        self.state.response()
    }

    pub fn confirmation(&self) -> Option<&ConfirmationDetails> {
        match &self.state {
            ToolCallState::AwaitingApproval { confirmation, .. } => Some(confirmation),
            _ => None,
        }
    }

    pub fn live_output(&self) -> Option<&str> {
        match &self.state {
            ToolCallState::Executing { live_output, .. } => live_output.as_deref(),
            _ => None,
        }
    }

    // ==================== Transitions ====================

    /// Validating → AwaitingApproval.
    pub(crate) fn await_approval(&mut self, confirmation: ConfirmationDetails) -> bool {
        if let ToolCallState::Validating { tool } = &self.state {
            self.state = ToolCallState::AwaitingApproval {
                tool: tool.clone(),
                confirmation,
            };
            return true;
        }
        false
    }

    /// Validating | AwaitingApproval → Scheduled.
    pub(crate) fn schedule(&mut self) -> bool {
        match &self.state {
            ToolCallState::Validating { tool } | ToolCallState::AwaitingApproval { tool, .. } => {
                self.state = ToolCallState::Scheduled { tool: tool.clone() };
                true
            }
            _ => false,
        }
    }

    /// Scheduled → Executing.
    pub(crate) fn start(&mut self, now: u64) -> bool {
        if let ToolCallState::Scheduled { tool } = &self.state {
            self.state = ToolCallState::Executing {
                tool: tool.clone(),
                started_at: now,
                live_output: None,
            };
            return true;
        }
        false
    }

    pub(crate) fn update_output(&mut self, output: String) -> bool {
        if let ToolCallState::Executing { live_output, .. } = &mut self.state {
            *live_output = Some(output);
            return true;
        }
        false
    }

    /// Executing → Success.
    pub(crate) fn succeed(&mut self, result: ToolExecutionResult, now: u64) -> bool {
        if let ToolCallState::Executing { tool, .. } = &self.state {
            let response = ToolResponse::success(&self.request.call_id, &self.request.name, result);
            self.state = ToolCallState::Success {
                tool: tool.clone(),
                response,
                duration_ms: now.saturating_sub(self.created_at),
            };
            return true;
        }
        false
    }

    /// Any non-terminal → Error.
    pub(crate) fn fail(&mut self, error: ToolError, now: u64) -> bool {
        if self.is_terminal() {
            return false;
        }
        let response = ToolResponse::failure(&self.request.call_id, &self.request.name, error);
        self.state = ToolCallState::Error {
            tool: self.tool().cloned(),
            response,
            duration_ms: now.saturating_sub(self.created_at),
        };
        true
    }

    /// Any non-terminal → Cancelled.
    pub(crate) fn cancel(&mut self, reason: &str, now: u64) -> bool {
        if self.is_terminal() {
            return false;
        }
        let response = ToolResponse::cancelled(&self.request.call_id, &self.request.name, reason);
        self.state = ToolCallState::Cancelled {
            tool: self.tool().cloned(),
            response,
            duration_ms: now.saturating_sub(self.created_at),
        };
        true
    }

    /// Terminal view of this call; `None` while it is still in flight.
    pub fn to_completed(&self) -> Option<CompletedToolCall> {
        let (outcome, tool, response, duration_ms) = match &self.state {
            ToolCallState::Success {
                tool,
                response,
                duration_ms,
            } => (CallOutcome::Success, Some(tool.clone()), response, *duration_ms),
            ToolCallState::Error {
                tool,
                response,
                duration_ms,
            } => (CallOutcome::Error, tool.clone(), response, *duration_ms),
            ToolCallState::Cancelled {
                tool,
                response,
                duration_ms,
            } => (CallOutcome::Cancelled, tool.clone(), response, *duration_ms),
            _ => return None,
        };
        Some(CompletedToolCall {
            request: self.request.clone(),
            outcome,
            tool,
            response: response.clone(),
            duration_ms,
        })
    }
}

/// Terminal outcome of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallOutcome {
    Success,
    Error,
    Cancelled,
}

/// A call in a terminal state, as delivered on batch completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedToolCall {
    pub request: ToolCallRequest,
    pub outcome: CallOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<ToolInfo>,
    pub response: ToolResponse,
    pub duration_ms: u64,
}

impl CompletedToolCall {
    pub fn call_id(&self) -> &CallId {
        &self.request.call_id
    }

    pub fn is_success(&self) -> bool {
        self.outcome == CallOutcome::Success
    }

    /// Error or cancellation message, if any.
    pub fn message(&self) -> Option<&str> {
        self.response.error_message()
    }
}
