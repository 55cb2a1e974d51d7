//! Domain layer for conductor
//!
//! This crate contains the data model of the tool-call scheduler: requests
//! proposed by the LLM, the responses handed back to it, the lifecycle of a
//! single call and the batch aggregate that groups calls submitted together.
//! It has no dependencies on an async runtime, I/O, or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tool calls
//!
//! A [`ToolCallRequest`] is one LLM-proposed invocation. Once submitted it is
//! tracked as a [`ToolCall`] whose [`ToolCallState`] is a tagged union over the
//! lifecycle (`Validating → AwaitingApproval → Scheduled → Executing → terminal`).
//!
//! ## Batches
//!
//! A [`Batch`] holds every call submitted by one `schedule()` invocation. All
//! mutation goes through [`Batch::apply`], a pure reducer over [`Transition`]s.

pub mod config;
pub mod core;
pub mod scheduling;
pub mod tool;

// Re-export commonly used types
pub use config::{
    ApprovalMode, ConfigIssue, ConfigIssueCode, OutputFormat, Severity,
};
pub use core::{error::DomainError, string::truncate, time::current_timestamp};
pub use scheduling::{
    batch::{Batch, BatchId, Transition},
    tool_call::{CallOutcome, CompletedToolCall, ToolCall, ToolCallState, ToolCallStatus},
};
pub use tool::{
    confirmation::{ConfirmationDetails, ConfirmationOutcome},
    entities::{CallId, ToolArgs, ToolCallRequest, ToolDefinition, ToolInfo, ToolParameter},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{FunctionResponse, ToolError, ToolExecutionResult, ToolResponse},
};
