//! Interactive confirmation of tool calls.
//!
//! [`InteractiveConfirmer`] watches the scheduler's snapshots and prompts
//! for every call that reaches AwaitingApproval, one at a time, answering
//! through [`ToolScheduler::resolve_confirmation`].
//!
//! # User Interface
//!
//! ```text
//! ── Confirm Shell Command ──────────────────────────────
//!   RunCommand [2]: cargo test
//!
//!   $ cargo test
//!
//!   [y] yes once  [a] always  [t] always for this tool  [n] no
//! confirm>
//! ```
//!
//! # Commands
//!
//! | Input | Aliases | Outcome |
//! |-------|---------|---------|
//! | `y` | `yes`, `once` | `ProceedOnce` |
//! | `a` | `always` | `ProceedAlways` |
//! | `t` | `tool` | `ProceedAlwaysForTool` |
//! | `n` | `no`, `cancel`, `q` | `Cancel` |
//!
//! Input comes from a line channel; [`InteractiveConfirmer::from_reader`]
//! feeds it from a detached reader thread so a pending prompt never holds
//! up shutdown. When input closes, every remaining confirmation is declined.

use crate::display::{ToolCallDisplay, map_tool_call};
use colored::Colorize;
use conductor_application::ToolScheduler;
use conductor_domain::{CallId, ConfirmationDetails, ConfirmationOutcome, ToolCall, ToolCallStatus};
use std::collections::HashSet;
use std::io::{self, BufRead, BufReader, Write};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Interprets one line of user input.
pub fn parse_decision(input: &str) -> Option<ConfirmationOutcome> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "once" => Some(ConfirmationOutcome::ProceedOnce),
        "a" | "always" => Some(ConfirmationOutcome::ProceedAlways),
        "t" | "tool" => Some(ConfirmationOutcome::ProceedAlwaysForTool),
        "n" | "no" | "cancel" | "q" => Some(ConfirmationOutcome::Cancel),
        _ => None,
    }
}

fn is_awaiting(calls: &[ToolCall], call_id: &CallId) -> bool {
    calls
        .iter()
        .any(|c| c.call_id() == call_id && c.status() == ToolCallStatus::AwaitingApproval)
}

/// Terminal confirmation loop for a [`ToolScheduler`].
pub struct InteractiveConfirmer {
    lines: mpsc::UnboundedReceiver<String>,
}

impl InteractiveConfirmer {
    /// Confirmer reading answers from `lines`
    pub fn new(lines: mpsc::UnboundedReceiver<String>) -> Self {
        Self { lines }
    }

    /// Confirmer reading answers from standard input
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(io::stdin()))
    }

    /// Confirmer reading answers line by line from `reader` on a detached thread
    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || {
            for line in reader.lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self::new(rx)
    }

    /// Prompt for confirmations until `stop` fires.
    pub async fn run(mut self, scheduler: ToolScheduler, stop: CancellationToken) {
        let mut snapshots = scheduler.subscribe();
        let mut asked: HashSet<CallId> = HashSet::new();

        loop {
            let next = {
                let calls = snapshots.borrow_and_update();
                asked.retain(|id| is_awaiting(&calls, id));
                calls
                    .iter()
                    .find(|c| {
                        c.status() == ToolCallStatus::AwaitingApproval
                            && !asked.contains(c.call_id())
                    })
                    .map(map_tool_call)
            };

            let Some(display) = next else {
                tokio::select! {
                    biased;
                    _ = stop.cancelled() => return,
                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
                continue;
            };

            let call_id = display.call_id.clone();
            asked.insert(call_id.clone());
            Self::display_prompt(&display);

            let outcome = tokio::select! {
                biased;
                _ = stop.cancelled() => return,
                _ = snapshots.wait_for(|calls| !is_awaiting(calls, &call_id)) => {
                    eprintln!("{}", "  (no longer waiting for an answer)".dimmed());
                    continue;
                }
                outcome = self.read_decision() => outcome,
            };

            match scheduler.resolve_confirmation(&call_id, outcome) {
                Ok(()) if outcome.is_proceed() => eprintln!("{}", "  ✓ approved".green()),
                Ok(()) => eprintln!("{}", "  ✗ declined".red()),
                Err(e) => debug!(call_id = %call_id, error = %e, "Confirmation no longer needed"),
            }
        }
    }

    /// Next valid answer; `Cancel` once input is exhausted.
    async fn read_decision(&mut self) -> ConfirmationOutcome {
        loop {
            Self::print_cursor();
            let Some(line) = self.lines.recv().await else {
                warn!("Confirmation input closed, declining");
                return ConfirmationOutcome::Cancel;
            };
            match parse_decision(&line) {
                Some(outcome) => return outcome,
                None if line.trim().is_empty() => continue,
                None => {
                    eprintln!("{} Unknown answer: {}", "⚠️".yellow(), line.trim().red());
                    eprintln!("Answer y, a, t or n.");
                }
            }
        }
    }

    fn print_cursor() {
        eprint!("{} ", "confirm>".magenta().bold());
        // A failed flush only delays the cursor
        let _ = io::stderr().flush();
    }

    /// Display the confirmation prompt UI
    fn display_prompt(display: &ToolCallDisplay) {
        let title = display
            .confirmation
            .as_ref()
            .map(ConfirmationDetails::title)
            .unwrap_or("Confirm");

        eprintln!();
        eprintln!("{}", format!("── {} {}", title, "─".repeat(50)).yellow().bold());
        eprintln!(
            "  {} {}: {}",
            display.name.bold(),
            format!("[{}]", display.call_id).dimmed(),
            display.description
        );

        match &display.confirmation {
            Some(ConfirmationDetails::Edit { file_path, diff, .. }) => {
                eprintln!();
                eprintln!("  {}", file_path.cyan());
                for line in diff.lines() {
                    let line = if line.starts_with('+') {
                        line.green()
                    } else if line.starts_with('-') {
                        line.red()
                    } else {
                        line.dimmed()
                    };
                    eprintln!("  {}", line);
                }
            }
            Some(ConfirmationDetails::Exec { command, .. }) => {
                eprintln!();
                eprintln!("  {} {}", "$".dimmed(), command.cyan());
            }
            Some(ConfirmationDetails::Mcp {
                server_name,
                tool_name,
                ..
            }) => {
                eprintln!();
                eprintln!("  {} on {}", tool_name.cyan(), server_name.cyan());
            }
            Some(ConfirmationDetails::Info { prompt, .. }) => {
                eprintln!();
                eprintln!("  {}", prompt);
            }
            None => {}
        }

        eprintln!();
        eprintln!(
            "  {} yes once  {} always  {} always for this tool  {} no",
            "[y]".green(),
            "[a]".green(),
            "[t]".green(),
            "[n]".red()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decision() {
        assert_eq!(parse_decision("y"), Some(ConfirmationOutcome::ProceedOnce));
        assert_eq!(parse_decision(" YES \n"), Some(ConfirmationOutcome::ProceedOnce));
        assert_eq!(parse_decision("always"), Some(ConfirmationOutcome::ProceedAlways));
        assert_eq!(parse_decision("t"), Some(ConfirmationOutcome::ProceedAlwaysForTool));
        assert_eq!(parse_decision("n"), Some(ConfirmationOutcome::Cancel));
        assert_eq!(parse_decision("maybe"), None);
        assert_eq!(parse_decision(""), None);
    }

    #[tokio::test]
    async fn test_reader_lines_reach_decision() {
        let input = io::Cursor::new(b"\nwhat\nalways\n".to_vec());
        let mut confirmer = InteractiveConfirmer::from_reader(input);

        assert_eq!(confirmer.read_decision().await, ConfirmationOutcome::ProceedAlways);
        assert_eq!(confirmer.read_decision().await, ConfirmationOutcome::Cancel);
    }
}
