//! Application use cases

pub mod tool_scheduler;
