//! CLI command definitions

use clap::{Parser, ValueEnum};
use conductor_domain::ApprovalMode;
use std::path::PathBuf;

/// Output format for batch results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One status line per call
    Text,
    /// JSON array of completed calls
    Json,
}

impl From<OutputFormat> for conductor_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// CLI arguments for conductor
#[derive(Parser, Debug)]
#[command(name = "conductor")]
#[command(author, version, about = "Run a batch of LLM tool calls with human confirmation")]
#[command(long_about = r#"
Conductor schedules a batch of tool calls the way an LLM coding agent would:
every call is validated, calls that change things ask for confirmation, and
execution starts only once the whole batch is cleared to run.

The batch is a JSON array of requests:
  [{"call_id": "1", "name": "read_file", "args": {"path": "Cargo.toml"}}]

Configuration files are loaded from (in priority order):
1. CONDUCTOR_* environment variables
2. --config <path>     Explicit config file
3. ./conductor.toml    Project-level config
4. ~/.config/conductor/config.toml   Global config

Example:
  conductor requests.json
  echo '[{"call_id":"1","name":"run_command","args":{"command":"ls"}}]' | conductor
  conductor --auto-edit -o json requests.json
"#)]
pub struct Cli {
    /// JSON file with the batch of requests (reads stdin when omitted or "-")
    #[arg(value_name = "REQUESTS_JSON")]
    pub requests: Option<PathBuf>,

    /// Run every call without asking
    #[arg(long, conflicts_with = "auto_edit")]
    pub yolo: bool,

    /// Approve file edits automatically, ask for everything else
    #[arg(long)]
    pub auto_edit: bool,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress lines
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Approval mode forced by flags, if any
    pub fn approval_override(&self) -> Option<ApprovalMode> {
        if self.yolo {
            Some(ApprovalMode::Yolo)
        } else if self.auto_edit {
            Some(ApprovalMode::AutoEdit)
        } else {
            None
        }
    }

    /// Requests file, `None` meaning stdin
    pub fn requests_path(&self) -> Option<&PathBuf> {
        self.requests
            .as_ref()
            .filter(|path| path.as_os_str() != "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["conductor"]);
        assert!(cli.requests_path().is_none());
        assert_eq!(cli.approval_override(), None);
        assert_eq!(cli.output, None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_approval_flags() {
        let cli = Cli::parse_from(["conductor", "--yolo"]);
        assert_eq!(cli.approval_override(), Some(ApprovalMode::Yolo));

        let cli = Cli::parse_from(["conductor", "--auto-edit", "batch.json"]);
        assert_eq!(cli.approval_override(), Some(ApprovalMode::AutoEdit));
        assert_eq!(cli.requests_path(), Some(&PathBuf::from("batch.json")));
    }

    #[test]
    fn test_yolo_conflicts_with_auto_edit() {
        assert!(Cli::try_parse_from(["conductor", "--yolo", "--auto-edit"]).is_err());
    }

    #[test]
    fn test_dash_reads_stdin() {
        let cli = Cli::parse_from(["conductor", "-vv", "-o", "json", "-"]);
        assert!(cli.requests_path().is_none());
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, Some(OutputFormat::Json));
    }
}
