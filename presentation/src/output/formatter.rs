//! Output formatter trait

use conductor_domain::{CompletedToolCall, OutputFormat};

/// Trait for formatting the results of a completed batch
pub trait OutputFormatter {
    /// Human-readable rendering, one block per call
    fn format_text(&self, results: &[CompletedToolCall]) -> String;

    /// Format as JSON
    fn format_json(&self, results: &[CompletedToolCall]) -> String;

    /// Dispatch on `format`
    fn format(&self, results: &[CompletedToolCall], format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.format_text(results),
            OutputFormat::Json => self.format_json(results),
        }
    }
}
