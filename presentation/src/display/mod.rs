//! Display mapping for tool-call snapshots

pub mod mapper;

pub use mapper::{DisplayStatus, ToolCallDisplay, map_tool_call, map_tool_calls};
