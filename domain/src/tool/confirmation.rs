//! Human confirmation value objects.
//!
//! A tool that wants a human to review an invocation returns
//! [`ConfirmationDetails`]; the human answers with a [`ConfirmationOutcome`].

use serde::{Deserialize, Serialize};

/// The human's decision on a pending tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationOutcome {
    ProceedOnce,
    ProceedAlways,
    ProceedAlwaysForServer,
    ProceedAlwaysForTool,
    ModifyThenProceed,
    Cancel,
}

impl ConfirmationOutcome {
    /// Every variant except `Cancel` lets the call run.
    pub fn is_proceed(&self) -> bool {
        !matches!(self, ConfirmationOutcome::Cancel)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationOutcome::ProceedOnce => "proceed_once",
            ConfirmationOutcome::ProceedAlways => "proceed_always",
            ConfirmationOutcome::ProceedAlwaysForServer => "proceed_always_server",
            ConfirmationOutcome::ProceedAlwaysForTool => "proceed_always_tool",
            ConfirmationOutcome::ModifyThenProceed => "modify_then_proceed",
            ConfirmationOutcome::Cancel => "cancel",
        }
    }
}

impl std::fmt::Display for ConfirmationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a tool is about to do, shown to the human before it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConfirmationDetails {
    /// A file is about to be created or modified
    Edit {
        title: String,
        file_path: String,
        diff: String,
    },
    /// A shell command is about to run
    Exec {
        title: String,
        command: String,
        root_command: String,
    },
    /// A tool on a remote protocol server is about to be called
    Mcp {
        title: String,
        server_name: String,
        tool_name: String,
    },
    /// Anything else
    Info { title: String, prompt: String },
}

impl ConfirmationDetails {
    pub fn title(&self) -> &str {
        match self {
            Self::Edit { title, .. }
            | Self::Exec { title, .. }
            | Self::Mcp { title, .. }
            | Self::Info { title, .. } => title,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edit { .. })
    }

    /// One-line summary of what will happen.
    pub fn summary(&self) -> String {
        match self {
            Self::Edit { file_path, .. } => format!("edit {}", file_path),
            Self::Exec { command, .. } => format!("run `{}`", command),
            Self::Mcp {
                server_name,
                tool_name,
                ..
            } => format!("call {} on {}", tool_name, server_name),
            Self::Info { prompt, .. } => prompt.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_cancel_is_not_proceed() {
        assert!(ConfirmationOutcome::ProceedOnce.is_proceed());
        assert!(ConfirmationOutcome::ProceedAlways.is_proceed());
        assert!(ConfirmationOutcome::ProceedAlwaysForServer.is_proceed());
        assert!(ConfirmationOutcome::ProceedAlwaysForTool.is_proceed());
        assert!(ConfirmationOutcome::ModifyThenProceed.is_proceed());
        assert!(!ConfirmationOutcome::Cancel.is_proceed());
    }

    #[test]
    fn test_details_accessors() {
        let exec = ConfirmationDetails::Exec {
            title: "Confirm Shell Command".to_string(),
            command: "rm -rf build".to_string(),
            root_command: "rm".to_string(),
        };
        assert_eq!(exec.title(), "Confirm Shell Command");
        assert_eq!(exec.summary(), "run `rm -rf build`");
        assert!(!exec.is_edit());

        let edit = ConfirmationDetails::Edit {
            title: "Confirm Edit".to_string(),
            file_path: "src/main.rs".to_string(),
            diff: "+fn main() {}".to_string(),
        };
        assert!(edit.is_edit());
    }

    #[test]
    fn test_details_serialize_tagged() {
        let info = ConfirmationDetails::Info {
            title: "t".to_string(),
            prompt: "p".to_string(),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "info");
    }
}
