//! Infrastructure layer for conductor
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the built-in tools, the tool registry,
//! and configuration file loading.

pub mod config;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, DEFAULT_COMMAND_TIMEOUT_SECS, FileConfig, FileLoggingConfig, FileOutputConfig,
    FileSchedulerConfig, FileToolsConfig,
};
pub use tools::{
    BUILTIN_TOOL_NAMES, BuiltinToolOptions, LocalToolRegistry, READ_FILE, RUN_COMMAND,
    ReadFileTool, RunCommandTool, WRITE_FILE, WriteFileTool,
};
