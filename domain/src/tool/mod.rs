//! Tool domain module
//!
//! This module defines the data that flows between the LLM, the scheduler
//! and individual tools. Tool *behavior* lives behind the `Tool` port in the
//! application layer; everything here is plain, serializable data.
//!
//! # Overview
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────────┐    ┌──────────────┐
//! │ ToolCallRequest │───▶│ ConfirmationDetails  │───▶│ ToolResponse │
//! │ (from the LLM)  │    │ (optional, for human)│    │ (to the LLM) │
//! └─────────────────┘    └──────────────────────┘    └──────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolCallRequest`] — one proposed invocation (`call_id`, `name`, `args`)
//! - [`ToolDefinition`] — optional parameter schema used for validation
//! - [`ToolInfo`] — the resolved tool's identity, captured for display
//! - [`ConfirmationDetails`] / [`ConfirmationOutcome`] — the human review step
//! - [`ToolResponse`] — output envelope for the LLM plus display text for humans
//! - [`ToolError`] — coded error carried by failed or cancelled responses

pub mod confirmation;
pub mod entities;
pub mod traits;
pub mod value_objects;

pub use confirmation::{ConfirmationDetails, ConfirmationOutcome};
pub use entities::{CallId, ToolArgs, ToolCallRequest, ToolDefinition, ToolInfo, ToolParameter};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{FunctionResponse, ToolError, ToolExecutionResult, ToolResponse};
