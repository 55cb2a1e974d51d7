//! Application layer for conductor
//!
//! This crate contains the tool-call scheduler use case, the ports it
//! consumes (tools, registry, cancellation source) and the ports it
//! drives (observers). It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::SchedulerConfig;
pub use ports::{
    cancellation::{CancellationSource, ChildTokens, FreshTokens},
    tool::{DecisionHook, ExecutionContext, LiveOutput, Tool, ToolConfirmation, tool_info},
    tool_call_observer::{NoToolCallObserver, ToolCallObserver},
    tool_registry::ToolRegistryPort,
};
pub use use_cases::tool_scheduler::{
    BatchCompletion, SIGNAL_CANCELLED_REASON, SchedulerError, ToolScheduler,
    ToolSchedulerBuilder, USER_DECLINED_REASON,
};
