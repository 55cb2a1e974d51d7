//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.
//! Enum-like fields stay strings so a typo degrades to a warning rather
//! than a load failure.

mod logging;
mod output;
mod scheduler;
mod tools;

pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use scheduler::FileSchedulerConfig;
pub use tools::{DEFAULT_COMMAND_TIMEOUT_SECS, FileToolsConfig};

use crate::tools::BUILTIN_TOOL_NAMES;
use conductor_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Scheduler settings
    pub scheduler: FileSchedulerConfig,
    /// Built-in tool settings
    pub tools: FileToolsConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log file settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks:
    /// 1. Enum parse failures (`scheduler.approval_mode`)
    /// 2. Out-of-range numbers (`tools.command_timeout_secs`)
    /// 3. Aliases pointing at tools that are not built in
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.scheduler.parse_approval_mode().1);
        issues.extend(self.tools.parse_command_timeout().1);
        issues.extend(self.tools.check_aliases(BUILTIN_TOOL_NAMES));

        issues
    }
}
