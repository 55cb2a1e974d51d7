//! Presentation layer for conductor
//!
//! This crate contains CLI definitions, the display mapping of scheduler
//! snapshots, result formatters, the console progress renderer and the
//! interactive confirmation prompt.

pub mod cli;
pub mod display;
pub mod interaction;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use display::{DisplayStatus, ToolCallDisplay, map_tool_call, map_tool_calls};
pub use interaction::InteractiveConfirmer;
pub use output::{console::ConsoleFormatter, formatter::OutputFormatter};
pub use progress::renderer::ConsoleRenderer;
