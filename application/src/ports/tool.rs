//! Tool port
//!
//! Defines the capability the scheduler drives: a named tool with a
//! parameter validator, an optional confirmation step and an executor.
//! Implementations (adapters) live in the infrastructure layer.
//!
//! # Cancellation contract
//!
//! The scheduler marks a call Cancelled as soon as the batch token fires,
//! whether or not `execute` has returned. Actually stopping in-flight work
//! (killing a child process, dropping a request) is the tool's job: an
//! implementation must watch [`ExecutionContext::cancel`] and return
//! promptly once it is cancelled.

use async_trait::async_trait;
use conductor_domain::{
    ConfirmationDetails, ConfirmationOutcome, DefaultToolValidator, ToolArgs, ToolDefinition,
    ToolError, ToolExecutionResult, ToolInfo, ToolValidator,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Callback a tool attaches to its confirmation request.
///
/// Invoked exactly once with the human's decision, before the scheduler
/// moves the call on. Tools use it to update their own allow-lists.
pub type DecisionHook = Box<dyn FnOnce(ConfirmationOutcome) + Send>;

/// A tool's request for human review.
pub struct ToolConfirmation {
    pub details: ConfirmationDetails,
    on_decision: Option<DecisionHook>,
}

impl ToolConfirmation {
    pub fn new(details: ConfirmationDetails) -> Self {
        Self {
            details,
            on_decision: None,
        }
    }

    pub fn with_decision_hook(
        mut self,
        hook: impl FnOnce(ConfirmationOutcome) + Send + 'static,
    ) -> Self {
        self.on_decision = Some(Box::new(hook));
        self
    }

    pub fn into_parts(self) -> (ConfirmationDetails, Option<DecisionHook>) {
        (self.details, self.on_decision)
    }
}

impl std::fmt::Debug for ToolConfirmation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolConfirmation")
            .field("details", &self.details)
            .field("has_hook", &self.on_decision.is_some())
            .finish()
    }
}

/// Sink for partial output produced while a tool runs.
#[derive(Clone)]
pub struct LiveOutput {
    sink: Option<Arc<dyn Fn(String) + Send + Sync>>,
}

impl LiveOutput {
    pub fn new(sink: impl Fn(String) + Send + Sync + 'static) -> Self {
        Self {
            sink: Some(Arc::new(sink)),
        }
    }

    /// Output that goes nowhere.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn emit(&self, chunk: impl Into<String>) {
        if let Some(sink) = &self.sink {
            sink(chunk.into());
        }
    }
}

impl std::fmt::Debug for LiveOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveOutput")
            .field("enabled", &self.sink.is_some())
            .finish()
    }
}

/// Everything a running tool receives besides its arguments.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    cancel: CancellationToken,
    output: LiveOutput,
}

impl ExecutionContext {
    pub fn new(cancel: CancellationToken, output: LiveOutput) -> Self {
        Self { cancel, output }
    }

    /// The batch-wide cancellation token.
    pub fn cancel(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn output(&self) -> &LiveOutput {
        &self.output
    }
}

/// Port for a single tool
#[async_trait]
pub trait Tool: Send + Sync {
    /// Registered name (what the LLM calls)
    fn name(&self) -> &str;

    fn display_name(&self) -> &str {
        self.name()
    }

    fn description(&self) -> &str {
        ""
    }

    /// Parameter schema, if the tool publishes one
    fn definition(&self) -> Option<ToolDefinition> {
        None
    }

    /// Synchronous, side-effect-free argument check.
    ///
    /// The default enforces required/unknown parameters against
    /// [`definition`](Tool::definition).
    fn validate_params(&self, args: &ToolArgs) -> Result<(), ToolError> {
        match self.definition() {
            Some(definition) => DefaultToolValidator
                .validate(args, &definition)
                .map_err(ToolError::invalid_argument),
            None => Ok(()),
        }
    }

    /// One-line description of what this invocation will do.
    fn describe_invocation(&self, args: &ToolArgs) -> String {
        serde_json::to_string(args).unwrap_or_default()
    }

    /// Ask whether a human must review this invocation.
    async fn should_confirm_execute(
        &self,
        _args: &ToolArgs,
        _cancel: &CancellationToken,
    ) -> Result<Option<ToolConfirmation>, ToolError> {
        Ok(None)
    }

    async fn execute(
        &self,
        args: &ToolArgs,
        ctx: &ExecutionContext,
    ) -> Result<ToolExecutionResult, ToolError>;
}

/// Snapshot of a tool's identity for one invocation.
pub fn tool_info(tool: &dyn Tool, args: &ToolArgs) -> ToolInfo {
    ToolInfo::new(tool.name(), tool.display_name())
        .with_description(tool.description())
        .with_invocation(tool.describe_invocation(args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_domain::ToolParameter;
    use std::sync::Mutex;

    struct Greeter;

    #[async_trait]
    impl Tool for Greeter {
        fn name(&self) -> &str {
            "greet"
        }

        fn definition(&self) -> Option<ToolDefinition> {
            Some(
                ToolDefinition::new("greet", "Say hello")
                    .with_parameter(ToolParameter::new("who", "Name to greet", true)),
            )
        }

        async fn execute(
            &self,
            args: &ToolArgs,
            _ctx: &ExecutionContext,
        ) -> Result<ToolExecutionResult, ToolError> {
            let who = args.get("who").and_then(|v| v.as_str()).unwrap_or("world");
            Ok(ToolExecutionResult::new(format!("hello {who}")))
        }
    }

    #[test]
    fn test_default_validation_uses_definition() {
        let mut args = ToolArgs::new();
        let err = Greeter.validate_params(&args).unwrap_err();
        assert_eq!(err.code, ToolError::INVALID_ARGUMENT);

        args.insert("who".into(), "bob".into());
        assert!(Greeter.validate_params(&args).is_ok());
    }

    #[test]
    fn test_tool_info_captures_invocation() {
        let mut args = ToolArgs::new();
        args.insert("who".into(), "bob".into());
        let info = tool_info(&Greeter, &args);
        assert_eq!(info.name, "greet");
        assert_eq!(info.display_name, "greet");
        assert_eq!(info.invocation, r#"{"who":"bob"}"#);
    }

    #[test]
    fn test_live_output_forwards_chunks() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let output = LiveOutput::new(move |chunk| sink.lock().unwrap().push(chunk));
        output.emit("a");
        output.emit(String::from("b"));
        LiveOutput::disabled().emit("dropped");
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_confirmation_hook_runs_once() {
        let seen = Arc::new(Mutex::new(None));
        let slot = seen.clone();
        let confirmation = ToolConfirmation::new(ConfirmationDetails::Info {
            title: "t".into(),
            prompt: "p".into(),
        })
        .with_decision_hook(move |outcome| *slot.lock().unwrap() = Some(outcome));

        let (_, hook) = confirmation.into_parts();
        (hook.unwrap())(ConfirmationOutcome::ProceedAlways);
        assert_eq!(*seen.lock().unwrap(), Some(ConfirmationOutcome::ProceedAlways));
    }
}
