//! Tool domain value objects — immutable result and error types
//!
//! These types form the **output side** of a tool call. Every call that
//! enters a batch ends with exactly one [`ToolResponse`], even when the tool
//! was never found or never ran, so the LLM always receives a function
//! response for every call it requested.

use super::entities::CallId;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Error carried by a failed or cancelled tool call.
///
/// | Code | Raised when |
/// |------|-------------|
/// | `NOT_FOUND` | Unknown tool or resource |
/// | `INVALID_ARGUMENT` | Parameter validation failed |
/// | `EXECUTION_FAILED` | Confirmation step or execution failed |
/// | `PERMISSION_DENIED` | Access denied |
/// | `TIMEOUT` | Operation timed out |
/// | `CANCELLED` | User declined or the batch was cancelled |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "CANCELLED")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub const NOT_FOUND: &'static str = "NOT_FOUND";
    pub const INVALID_ARGUMENT: &'static str = "INVALID_ARGUMENT";
    pub const EXECUTION_FAILED: &'static str = "EXECUTION_FAILED";
    pub const PERMISSION_DENIED: &'static str = "PERMISSION_DENIED";
    pub const TIMEOUT: &'static str = "TIMEOUT";
    pub const CANCELLED: &'static str = "CANCELLED";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            Self::NOT_FOUND,
            format!("Resource not found: {}", resource.into()),
        )
    }

    /// The requested tool has no registered implementation.
    pub fn unknown_tool(name: &str) -> Self {
        Self::new(
            Self::NOT_FOUND,
            format!("Tool \"{}\" not found in registry.", name),
        )
    }

    pub fn permission_denied(resource: impl Into<String>) -> Self {
        Self::new(
            Self::PERMISSION_DENIED,
            format!("Permission denied: {}", resource.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Self::INVALID_ARGUMENT, message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(Self::EXECUTION_FAILED, message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            Self::TIMEOUT,
            format!("Operation timed out: {}", operation.into()),
        )
    }

    pub fn cancelled(reason: impl Into<String>) -> Self {
        Self::new(
            Self::CANCELLED,
            format!("[Operation Cancelled] Reason: {}", reason.into()),
        )
    }

    pub fn is_cancelled(&self) -> bool {
        self.code == Self::CANCELLED
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// What a tool's `execute` produces on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolExecutionResult {
    /// Content returned to the LLM
    pub llm_content: String,
    /// Optional human-facing rendering (falls back to `llm_content`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_display: Option<String>,
}

impl ToolExecutionResult {
    pub fn new(llm_content: impl Into<String>) -> Self {
        Self {
            llm_content: llm_content.into(),
            return_display: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.return_display = Some(display.into());
        self
    }
}

/// The function-response envelope handed back to the LLM.
///
/// `response` is `{"output": ...}` for successes and `{"error": ...}` for
/// failures and cancellations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub id: CallId,
    pub name: String,
    pub response: serde_json::Value,
}

impl FunctionResponse {
    pub fn output(id: CallId, name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            response: json!({ "output": output.into() }),
        }
    }

    pub fn error(id: CallId, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            response: json!({ "error": message.into() }),
        }
    }
}

/// The unit handed back to the caller for one tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub call_id: CallId,
    /// Envelope for the LLM
    pub output: FunctionResponse,
    /// Rendering for humans
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

impl ToolResponse {
    /// Wrap a successful execution result.
    pub fn success(call_id: &CallId, tool_name: &str, result: ToolExecutionResult) -> Self {
        let display = result
            .return_display
            .unwrap_or_else(|| result.llm_content.clone());
        Self {
            call_id: call_id.clone(),
            output: FunctionResponse::output(call_id.clone(), tool_name, result.llm_content),
            display: Some(display),
            error: None,
        }
    }

    /// Wrap an error (also used for cancellations).
    pub fn failure(call_id: &CallId, tool_name: &str, error: ToolError) -> Self {
        Self {
            call_id: call_id.clone(),
            output: FunctionResponse::error(call_id.clone(), tool_name, error.message.clone()),
            display: Some(error.message.clone()),
            error: Some(error),
        }
    }

    pub fn cancelled(call_id: &CallId, tool_name: &str, reason: &str) -> Self {
        Self::failure(call_id, tool_name, ToolError::cancelled(reason))
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Error message, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}
