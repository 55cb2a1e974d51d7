//! Tool implementations for conductor
//!
//! Built-in tools implementing the application layer's [`Tool`] port, and
//! [`LocalToolRegistry`], which resolves names and aliases to them.
//!
//! | Tool | Confirmation |
//! |------|--------------|
//! | `read_file` | never |
//! | `write_file` | `Edit` with a line diff |
//! | `run_command` | `Exec`, unless the root command is trusted |
//!
//! [`Tool`]: conductor_application::Tool

mod args;
pub mod command;
pub mod file;
pub mod registry;

pub use command::{RUN_COMMAND, RunCommandTool};
pub use file::{READ_FILE, ReadFileTool, WRITE_FILE, WriteFileTool};
pub use registry::LocalToolRegistry;

use std::path::PathBuf;
use std::time::Duration;

/// Names of every built-in tool
pub const BUILTIN_TOOL_NAMES: &[&str] = &[READ_FILE, WRITE_FILE, RUN_COMMAND];

/// Settings shared by the built-in tools
#[derive(Debug, Clone)]
pub struct BuiltinToolOptions {
    /// Base for relative paths; the process cwd when `None`
    pub working_dir: Option<PathBuf>,
    pub command_timeout: Duration,
    /// Root commands `run_command` runs without asking
    pub trusted_commands: Vec<String>,
}

impl Default for BuiltinToolOptions {
    fn default() -> Self {
        Self {
            working_dir: None,
            command_timeout: Duration::from_secs(crate::config::DEFAULT_COMMAND_TIMEOUT_SECS),
            trusted_commands: Vec::new(),
        }
    }
}
