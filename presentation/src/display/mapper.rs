//! Projection of scheduler state into display rows.
//!
//! [`map_tool_call`] is pure: it reads a [`ToolCall`] snapshot and never
//! feeds anything back into scheduling.

use conductor_domain::{CallId, ConfirmationDetails, ToolCall, ToolCallState};
use serde::Serialize;

/// Coarse status shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Pending,
    Confirming,
    Executing,
    Succeeded,
    Canceled,
    Failed,
}

impl DisplayStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Canceled | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirming => "confirming",
            Self::Executing => "executing",
            Self::Succeeded => "succeeded",
            Self::Canceled => "canceled",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of tool-call status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCallDisplay {
    pub call_id: CallId,
    /// Tool display name, or the requested name when the tool is unknown
    pub name: String,
    /// What this invocation does
    pub description: String,
    pub status: DisplayStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_display: Option<String>,
    /// Present only while Confirming
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<ConfirmationDetails>,
    /// Latest streamed chunk while Executing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_output: Option<String>,
}

/// Map a call's lifecycle state onto a [`ToolCallDisplay`].
pub fn map_tool_call(call: &ToolCall) -> ToolCallDisplay {
    let status = match &call.state {
        // Parameter and confirmation checks read as work in progress
        ToolCallState::Validating { .. } => DisplayStatus::Executing,
        ToolCallState::AwaitingApproval { .. } => DisplayStatus::Confirming,
        ToolCallState::Scheduled { .. } => DisplayStatus::Pending,
        ToolCallState::Executing { .. } => DisplayStatus::Executing,
        ToolCallState::Success { .. } => DisplayStatus::Succeeded,
        ToolCallState::Cancelled { .. } => DisplayStatus::Canceled,
        ToolCallState::Error { .. } => DisplayStatus::Failed,
    };

    let (name, description) = match call.tool() {
        Some(tool) => {
            let description = if tool.invocation.is_empty() {
                call.request.args_summary()
            } else {
                tool.invocation.clone()
            };
            (tool.display_name.clone(), description)
        }
        None => (call.request.name.clone(), call.request.args_summary()),
    };

    let result_display = call.response().and_then(|response| {
        response
            .display
            .clone()
            .or_else(|| response.error_message().map(str::to_string))
    });

    ToolCallDisplay {
        call_id: call.call_id().clone(),
        name,
        description,
        status,
        result_display,
        confirmation: call.confirmation().cloned(),
        live_output: call.live_output().map(str::to_string),
    }
}

/// Map a whole snapshot, preserving order.
pub fn map_tool_calls(calls: &[ToolCall]) -> Vec<ToolCallDisplay> {
    calls.iter().map(map_tool_call).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_domain::{
        Batch, BatchId, ToolCallRequest, ToolError, ToolExecutionResult, ToolInfo, Transition,
    };

    fn info() -> ToolInfo {
        ToolInfo::new("write_file", "WriteFile").with_invocation("write /tmp/a.txt")
    }

    fn request(id: &str) -> ToolCallRequest {
        ToolCallRequest::new(id, "write_file").with_arg("path", "/tmp/a.txt")
    }

    fn batch() -> Batch {
        Batch::new(
            BatchId(1),
            vec![
                ToolCall::validating(request("1"), info(), 0),
                ToolCall::validating(request("2"), info(), 0),
            ],
        )
        .unwrap()
    }

    fn first(batch: &Batch) -> ToolCallDisplay {
        map_tool_call(batch.calls().next().unwrap())
    }

    #[test]
    fn test_validating_shows_as_executing() {
        let display = first(&batch());
        assert_eq!(display.status, DisplayStatus::Executing);
        assert_eq!(display.name, "WriteFile");
        assert_eq!(display.description, "write /tmp/a.txt");
        assert!(display.result_display.is_none());
    }

    #[test]
    fn test_awaiting_approval_carries_details() {
        let details = ConfirmationDetails::Edit {
            title: "Confirm Edit".to_string(),
            file_path: "/tmp/a.txt".to_string(),
            diff: "+ hello".to_string(),
        };
        let (batch, _) = batch().apply(
            Transition::AwaitApproval {
                call_id: "1".into(),
                confirmation: details.clone(),
            },
            10,
        );

        let display = first(&batch);
        assert_eq!(display.status, DisplayStatus::Confirming);
        assert_eq!(display.confirmation, Some(details));
    }

    #[test]
    fn test_scheduled_shows_as_pending() {
        let (batch, _) = batch().apply(Transition::Schedule { call_id: "1".into() }, 10);
        assert_eq!(first(&batch).status, DisplayStatus::Pending);
    }

    #[test]
    fn test_terminal_states() {
        let (batch, _) = batch().apply(
            Transition::Fail {
                call_id: "1".into(),
                error: ToolError::execution_failed("disk full"),
            },
            10,
        );
        let display = first(&batch);
        assert_eq!(display.status, DisplayStatus::Failed);
        assert_eq!(display.result_display.as_deref(), Some("disk full"));

        let (batch, _) = batch.apply(
            Transition::CancelAll {
                reason: "user pressed escape".to_string(),
            },
            20,
        );
        let displays = map_tool_calls(&batch.snapshot());
        assert_eq!(displays[0].status, DisplayStatus::Failed);
        assert_eq!(displays[1].status, DisplayStatus::Canceled);
        assert!(displays[1]
            .result_display
            .as_deref()
            .unwrap()
            .contains("user pressed escape"));
    }

    #[test]
    fn test_success_uses_display_text() {
        let (batch, _) = batch().apply(Transition::Schedule { call_id: "1".into() }, 1);
        let (batch, _) = batch.apply(Transition::Schedule { call_id: "2".into() }, 1);
        let (batch, _) = batch.apply(Transition::StartExecution, 2);
        let (batch, _) = batch.apply(
            Transition::Succeed {
                call_id: "1".into(),
                result: ToolExecutionResult::new("12 bytes").with_display("Wrote 12 bytes"),
            },
            3,
        );

        let display = first(&batch);
        assert_eq!(display.status, DisplayStatus::Succeeded);
        assert_eq!(display.result_display.as_deref(), Some("Wrote 12 bytes"));
    }

    #[test]
    fn test_unknown_tool_uses_raw_args() {
        let call = ToolCall::unknown_tool(
            ToolCallRequest::new("9", "grep_search").with_arg("pattern", "todo"),
            0,
        );
        let display = map_tool_call(&call);

        assert_eq!(display.status, DisplayStatus::Failed);
        assert_eq!(display.name, "grep_search");
        assert_eq!(display.description, r#"{"pattern":"todo"}"#);
        assert!(display.result_display.unwrap().contains("not found in registry"));
    }
}
