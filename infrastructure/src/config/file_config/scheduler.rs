//! Scheduler configuration from TOML (`[scheduler]` section)

use conductor_domain::{ApprovalMode, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw scheduler configuration from TOML
///
/// # Example
///
/// ```toml
/// [scheduler]
/// approval_mode = "auto_edit"   # "default", "auto_edit", "yolo"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSchedulerConfig {
    pub approval_mode: String,
}

impl Default for FileSchedulerConfig {
    fn default() -> Self {
        Self {
            approval_mode: ApprovalMode::default().as_str().to_string(),
        }
    }
}

impl FileSchedulerConfig {
    /// Parse approval_mode into [`ApprovalMode`], returning warnings on failure.
    pub fn parse_approval_mode(&self) -> (ApprovalMode, Vec<ConfigIssue>) {
        match self.approval_mode.parse::<ApprovalMode>() {
            Ok(mode) => (mode, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "scheduler.approval_mode".to_string(),
                        value: self.approval_mode.clone(),
                        valid_values: ApprovalMode::valid_values(),
                    },
                    format!(
                        "scheduler.approval_mode: unknown value '{}', falling back to 'default'",
                        self.approval_mode
                    ),
                );
                (ApprovalMode::default(), vec![issue])
            }
        }
    }
}
