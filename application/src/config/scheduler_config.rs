//! Scheduler parameters — use case behavior control.
//!
//! These are application-layer concerns, not domain policy: the domain only
//! names the [`ApprovalMode`]; the scheduler decides what it means for each
//! call.

use conductor_domain::ApprovalMode;
use serde::{Deserialize, Serialize};

/// Static configuration of a [`ToolScheduler`](crate::ToolScheduler).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// How much human confirmation to ask for.
    pub approval_mode: ApprovalMode,
}

impl SchedulerConfig {
    pub fn new(approval_mode: ApprovalMode) -> Self {
        Self { approval_mode }
    }

    // ==================== Builder Methods ====================

    pub fn with_approval_mode(mut self, approval_mode: ApprovalMode) -> Self {
        self.approval_mode = approval_mode;
        self
    }

    /// Confirmation is skipped for every call.
    pub fn skips_confirmation(&self) -> bool {
        self.approval_mode == ApprovalMode::Yolo
    }

    /// File-edit confirmations are approved without asking.
    pub fn auto_approves_edits(&self) -> bool {
        self.approval_mode == ApprovalMode::AutoEdit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_asks() {
        let config = SchedulerConfig::default();
        assert!(!config.skips_confirmation());
        assert!(!config.auto_approves_edits());
    }

    #[test]
    fn test_modes() {
        assert!(SchedulerConfig::new(ApprovalMode::Yolo).skips_confirmation());
        assert!(
            SchedulerConfig::default()
                .with_approval_mode(ApprovalMode::AutoEdit)
                .auto_approves_edits()
        );
    }
}
