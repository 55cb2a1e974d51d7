//! Status lines for tool calls as they move through the scheduler

use crate::display::{DisplayStatus, ToolCallDisplay, map_tool_call};
use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use conductor_application::ToolCallObserver;
use conductor_domain::{CallId, CompletedToolCall, ToolCall, truncate};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

const LIVE_OUTPUT_WIDTH: usize = 100;

#[derive(Debug, Default)]
struct Seen {
    status: Option<DisplayStatus>,
    live_output: Option<String>,
}

/// Prints a line to stderr whenever a call changes status.
///
/// Snapshots may arrive out of order from concurrent tasks; a call whose
/// status already reached a terminal one is never reported again.
#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    seen: Mutex<HashMap<CallId, Seen>>,
    show_live_output: bool,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also print the latest streamed line of executing calls
    pub fn with_live_output(mut self, enabled: bool) -> Self {
        self.show_live_output = enabled;
        self
    }

    /// Rows that changed since the last snapshot, with a flag telling
    /// whether only the live output moved.
    fn changes(&self, calls: &[ToolCall]) -> Vec<(ToolCallDisplay, bool)> {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        let mut changed = Vec::new();

        for display in calls.iter().map(map_tool_call) {
            let entry = seen.entry(display.call_id.clone()).or_default();
            if entry.status.is_some_and(|s| s.is_terminal()) {
                continue;
            }
            if entry.status != Some(display.status) {
                entry.status = Some(display.status);
                entry.live_output = display.live_output.clone();
                changed.push((display, false));
            } else if self.show_live_output
                && display.live_output.is_some()
                && entry.live_output != display.live_output
            {
                entry.live_output = display.live_output.clone();
                changed.push((display, true));
            }
        }

        changed
    }

    /// One colored status line
    pub fn status_line(display: &ToolCallDisplay) -> String {
        let status = match display.status {
            DisplayStatus::Pending => "pending".dimmed(),
            DisplayStatus::Confirming => "confirm".magenta(),
            DisplayStatus::Executing => "running".cyan(),
            DisplayStatus::Succeeded => "done".green(),
            DisplayStatus::Canceled => "canceled".yellow(),
            DisplayStatus::Failed => "failed".red(),
        };
        let mut line = format!(
            "{:>9} {} {} {}",
            status,
            format!("[{}]", display.call_id).dimmed(),
            display.name.bold(),
            display.description
        );
        if matches!(display.status, DisplayStatus::Failed | DisplayStatus::Canceled) {
            if let Some(message) = &display.result_display {
                line.push_str(&format!(" {} {}", "-".dimmed(), message));
            }
        }
        line
    }

    fn live_line(display: &ToolCallDisplay) -> Option<String> {
        let last = display.live_output.as_deref()?.lines().last()?;
        Some(format!(
            "{:>9} {} {}",
            "",
            format!("[{}]", display.call_id).dimmed(),
            truncate(last, LIVE_OUTPUT_WIDTH).dimmed()
        ))
    }
}

impl ToolCallObserver for ConsoleRenderer {
    fn on_tool_calls_update(&self, calls: &[ToolCall]) {
        for (display, live_only) in self.changes(calls) {
            if live_only {
                if let Some(line) = Self::live_line(&display) {
                    eprintln!("{}", line);
                }
            } else {
                eprintln!("{}", Self::status_line(&display));
            }
        }
    }

    fn on_all_tool_calls_complete(&self, completed: &[CompletedToolCall]) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        eprint!("{}", ConsoleFormatter::summary(completed));
    }
}
