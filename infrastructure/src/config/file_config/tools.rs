//! Tools configuration from TOML (`[tools]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [tools]
//! working_dir = "."
//! command_timeout_secs = 120
//! trusted_commands = ["ls", "cat", "git"]
//!
//! [tools.aliases]
//! bash = "run_command"
//! cat = "read_file"
//! ```

use crate::tools::BuiltinToolOptions;
use conductor_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for `run_command` (60 seconds)
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 60;

/// Raw tools configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Base directory for relative paths and commands (defaults to cwd)
    pub working_dir: Option<PathBuf>,
    /// Timeout for `run_command`
    pub command_timeout_secs: u64,
    /// Alternative names (alias -> registered tool name)
    pub aliases: BTreeMap<String, String>,
    /// Root commands `run_command` runs without asking
    pub trusted_commands: Vec<String>,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert("bash".to_string(), "run_command".to_string());
        aliases.insert("shell".to_string(), "run_command".to_string());

        Self {
            working_dir: None,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            aliases,
            trusted_commands: Vec::new(),
        }
    }
}

impl FileToolsConfig {
    /// Options for [`LocalToolRegistry::builtin`](crate::tools::LocalToolRegistry::builtin).
    pub fn builtin_options(&self) -> BuiltinToolOptions {
        BuiltinToolOptions {
            working_dir: self.working_dir.clone(),
            command_timeout: self.parse_command_timeout().0,
            trusted_commands: self.trusted_commands.clone(),
        }
    }

    /// Command timeout, with 0 replaced by the default.
    pub fn parse_command_timeout(&self) -> (Duration, Vec<ConfigIssue>) {
        if self.command_timeout_secs == 0 {
            let issue = ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "tools.command_timeout_secs".to_string(),
                },
                format!(
                    "tools.command_timeout_secs: must be positive, falling back to {}",
                    DEFAULT_COMMAND_TIMEOUT_SECS
                ),
            );
            return (Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS), vec![issue]);
        }
        (Duration::from_secs(self.command_timeout_secs), vec![])
    }

    /// Aliases whose target is not one of `known` tools.
    pub fn check_aliases(&self, known: &[&str]) -> Vec<ConfigIssue> {
        self.aliases
            .iter()
            .filter(|(_, target)| !known.contains(&target.as_str()))
            .map(|(alias, target)| {
                ConfigIssue::warning(
                    ConfigIssueCode::DanglingAlias {
                        alias: alias.clone(),
                        target: target.clone(),
                    },
                    format!(
                        "tools.aliases.{}: target '{}' is not a registered tool, alias ignored",
                        alias, target
                    ),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_aliases() {
        let config = FileToolsConfig::default();
        assert_eq!(config.aliases.get("bash").map(String::as_str), Some("run_command"));
        assert_eq!(config.command_timeout_secs, DEFAULT_COMMAND_TIMEOUT_SECS);
    }

    #[test]
    fn test_zero_timeout_warns() {
        let config = FileToolsConfig {
            command_timeout_secs: 0,
            ..Default::default()
        };
        let (timeout, issues) = config.parse_command_timeout();
        assert_eq!(timeout, Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS));
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_builtin_options() {
        let config = FileToolsConfig {
            working_dir: Some(PathBuf::from("/srv/app")),
            command_timeout_secs: 0,
            trusted_commands: vec!["ls".to_string()],
            ..Default::default()
        };
        let options = config.builtin_options();
        assert_eq!(options.working_dir, Some(PathBuf::from("/srv/app")));
        assert_eq!(options.command_timeout, Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS));
        assert_eq!(options.trusted_commands, vec!["ls"]);
    }

    #[test]
    fn test_dangling_alias() {
        let mut config = FileToolsConfig::default();
        config.aliases.insert("grep".to_string(), "grep_search".to_string());

        let issues = config.check_aliases(&["run_command", "read_file"]);
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].code,
            ConfigIssueCode::DanglingAlias {
                alias: "grep".to_string(),
                target: "grep_search".to_string(),
            }
        );
    }
}
