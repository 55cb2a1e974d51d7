//! Console output formatter for batch results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use conductor_domain::{CallOutcome, CompletedToolCall};

/// Formats completed tool calls for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One block per call, in request order, followed by a tally
    pub fn format_text(results: &[CompletedToolCall]) -> String {
        let mut output = String::new();

        for result in results {
            let marker = match result.outcome {
                CallOutcome::Success => "v".green(),
                CallOutcome::Error => "x".red(),
                CallOutcome::Cancelled => "-".yellow(),
            };
            output.push_str(&format!(
                "{} {} {} {}\n",
                marker,
                format!("[{}]", result.call_id()).dimmed(),
                result.request.name.bold(),
                format!("({} ms)", result.duration_ms).dimmed()
            ));

            let body = result
                .response
                .display
                .as_deref()
                .or_else(|| result.message())
                .unwrap_or_default();
            if !body.is_empty() {
                output.push_str(&Self::indent(body, "    "));
                output.push('\n');
            }
        }

        output.push_str(&Self::summary(results));
        output
    }

    /// Format as JSON
    pub fn format_json(results: &[CompletedToolCall]) -> String {
        serde_json::to_string_pretty(results).unwrap_or_else(|_| "[]".to_string())
    }

    /// `N succeeded, N failed, N canceled`
    pub fn summary(results: &[CompletedToolCall]) -> String {
        let count = |outcome: CallOutcome| results.iter().filter(|r| r.outcome == outcome).count();
        format!(
            "{} succeeded, {} failed, {} canceled\n",
            count(CallOutcome::Success).to_string().green(),
            count(CallOutcome::Error).to_string().red(),
            count(CallOutcome::Cancelled).to_string().yellow()
        )
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_text(&self, results: &[CompletedToolCall]) -> String {
        Self::format_text(results)
    }

    fn format_json(&self, results: &[CompletedToolCall]) -> String {
        Self::format_json(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_domain::{
        CompletedToolCall, ToolCallRequest, ToolError, ToolExecutionResult, ToolResponse,
    };

    fn completed(id: &str, outcome: CallOutcome, response: ToolResponse) -> CompletedToolCall {
        CompletedToolCall {
            request: ToolCallRequest::new(id, "run_command").with_arg("command", "ls"),
            outcome,
            tool: None,
            response,
            duration_ms: 7,
        }
    }

    fn results() -> Vec<CompletedToolCall> {
        vec![
            completed(
                "1",
                CallOutcome::Success,
                ToolResponse::success(
                    &"1".into(),
                    "run_command",
                    ToolExecutionResult::new("a\nb"),
                ),
            ),
            completed(
                "2",
                CallOutcome::Cancelled,
                ToolResponse::cancelled(&"2".into(), "run_command", "user pressed ctrl-c"),
            ),
            completed(
                "3",
                CallOutcome::Error,
                ToolResponse::failure(
                    &"3".into(),
                    "run_command",
                    ToolError::execution_failed("boom"),
                ),
            ),
        ]
    }

    #[test]
    fn test_format_text_lists_calls_in_order() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_text(&results());

        let first = text.find("[1]").unwrap();
        let second = text.find("[2]").unwrap();
        let third = text.find("[3]").unwrap();
        assert!(first < second && second < third);
        assert!(text.contains("    a\n    b"));
        assert!(text.contains("Reason: user pressed ctrl-c"));
        assert!(text.ends_with("1 succeeded, 1 failed, 1 canceled\n"));
    }

    #[test]
    fn test_format_json_is_array() {
        let json = ConsoleFormatter::format_json(&results());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let calls = value.as_array().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0]["outcome"], "success");
        assert_eq!(calls[1]["outcome"], "cancelled");
        assert_eq!(calls[2]["response"]["output"]["response"]["error"], "boom");
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
