//! Approval mode value object

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How much human confirmation the scheduler asks for.
///
/// | Mode | Behavior |
/// |------|----------|
/// | `Default` | Each tool decides through `should_confirm_execute` |
/// | `AutoEdit` | File-edit confirmations are approved automatically |
/// | `Yolo` | Confirmation is skipped for every call |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalMode {
    #[default]
    Default,
    AutoEdit,
    Yolo,
}

impl ApprovalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalMode::Default => "default",
            ApprovalMode::AutoEdit => "auto_edit",
            ApprovalMode::Yolo => "yolo",
        }
    }

    /// Valid config spellings, used for diagnostics.
    pub fn valid_values() -> Vec<String> {
        vec![
            "default".to_string(),
            "auto_edit".to_string(),
            "yolo".to_string(),
        ]
    }
}

impl std::fmt::Display for ApprovalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApprovalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "default" | "ask" => Ok(ApprovalMode::Default),
            "auto_edit" | "autoedit" => Ok(ApprovalMode::AutoEdit),
            "yolo" => Ok(ApprovalMode::Yolo),
            other => Err(format!("Unknown approval mode: {}", other)),
        }
    }
}
