//! Command execution tool: run_command
//!
//! Runs `sh -c <command>` (or `cmd /C` on Windows) under `tokio::process`.
//! The child is spawned with `kill_on_drop`, so dropping the execution
//! future on cancellation or timeout kills it.

use super::args::{get_str, get_u64, require_str, resolve};
use async_trait::async_trait;
use conductor_application::{ExecutionContext, LiveOutput, Tool, ToolConfirmation};
use conductor_domain::{
    ConfirmationDetails, ConfirmationOutcome, DefaultToolValidator, ToolArgs, ToolDefinition,
    ToolError, ToolExecutionResult, ToolParameter, ToolValidator, truncate,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Tool name constant
pub const RUN_COMMAND: &str = "run_command";

/// Maximum output size (1 MB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// Live output keeps only the tail of what the command printed
const LIVE_OUTPUT_TAIL: usize = 4 * 1024;

/// Runs shell commands, asking before each new root command
#[derive(Debug, Clone)]
pub struct RunCommandTool {
    working_dir: Option<PathBuf>,
    timeout: Duration,
    allowed: Arc<Mutex<HashSet<String>>>,
    trust_all: Arc<AtomicBool>,
}

impl RunCommandTool {
    pub fn new(working_dir: Option<PathBuf>, timeout: Duration) -> Self {
        Self {
            working_dir,
            timeout,
            allowed: Arc::new(Mutex::new(HashSet::new())),
            trust_all: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Pre-seed the allow-list.
    pub fn with_trusted<I, S>(self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(commands.into_iter().map(Into::into));
        self
    }

    pub fn is_trusted(&self, root_command: &str) -> bool {
        self.trust_all.load(Ordering::SeqCst)
            || self
                .allowed
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains(root_command)
    }

    /// Whether `command` may run without asking.
    ///
    /// Every chained segment must have a trusted root, and command
    /// substitution always asks.
    pub fn is_command_trusted(&self, command: &str) -> bool {
        if self.trust_all.load(Ordering::SeqCst) {
            return true;
        }
        if has_substitution(command) {
            return false;
        }
        let roots = root_commands(command);
        let allowed = self.allowed.lock().unwrap_or_else(PoisonError::into_inner);
        !roots.is_empty() && roots.iter().all(|root| allowed.contains(root))
    }
}

/// Root command of each segment of a command line, in order and deduplicated.
///
/// Segments are separated by `;`, `|`, `&` and newlines, which covers `&&`
/// and `||` as well. A `&` directly after `>` or `<` is part of a
/// redirection such as `2>&1`.
pub fn root_commands(command: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut prev = None;
    for (i, c) in command.char_indices() {
        let separator = match c {
            ';' | '|' | '\n' => true,
            '&' => !matches!(prev, Some('>') | Some('<')),
            _ => false,
        };
        if separator {
            segments.push(&command[start..i]);
            start = i + c.len_utf8();
        }
        prev = Some(c);
    }
    segments.push(&command[start..]);

    let mut roots: Vec<String> = Vec::new();
    for root in segments.into_iter().filter_map(segment_root) {
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}

/// First word of one segment, without any leading path.
fn segment_root(segment: &str) -> Option<String> {
    let first = segment.split_whitespace().next()?;
    let root = Path::new(first)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| first.to_string());
    Some(root)
}

fn has_substitution(command: &str) -> bool {
    command.contains("$(")
        || command.contains('`')
        || command.contains("<(")
        || command.contains(">(")
}

#[async_trait]
impl Tool for RunCommandTool {
    fn name(&self) -> &str {
        RUN_COMMAND
    }

    fn display_name(&self) -> &str {
        "Shell"
    }

    fn description(&self) -> &str {
        "Execute a shell command and return its output. Use with caution."
    }

    fn definition(&self) -> Option<ToolDefinition> {
        Some(
            ToolDefinition::new(RUN_COMMAND, self.description())
                .with_parameter(
                    ToolParameter::new("command", "The command to execute", true)
                        .with_type("string"),
                )
                .with_parameter(
                    ToolParameter::new("working_dir", "Working directory for the command", false)
                        .with_type("path"),
                )
                .with_parameter(
                    ToolParameter::new("timeout_secs", "Timeout in seconds", false)
                        .with_type("number"),
                ),
        )
    }

    fn validate_params(&self, args: &ToolArgs) -> Result<(), ToolError> {
        if let Some(definition) = self.definition() {
            DefaultToolValidator
                .validate(args, &definition)
                .map_err(ToolError::invalid_argument)?;
        }
        if require_str(args, "command")?.trim().is_empty() {
            return Err(ToolError::invalid_argument("Command must not be empty"));
        }
        Ok(())
    }

    fn describe_invocation(&self, args: &ToolArgs) -> String {
        let command = get_str(args, "command").unwrap_or("?");
        match get_str(args, "working_dir") {
            Some(dir) => format!("{} [in {}]", command, dir),
            None => command.to_string(),
        }
    }

    async fn should_confirm_execute(
        &self,
        args: &ToolArgs,
        _cancel: &CancellationToken,
    ) -> Result<Option<ToolConfirmation>, ToolError> {
        let command = require_str(args, "command")?;
        if self.is_command_trusted(command) {
            debug!(command, "Command is trusted, skipping confirmation");
            return Ok(None);
        }

        let roots = root_commands(command);
        let allowed = self.allowed.clone();
        let trust_all = self.trust_all.clone();
        let confirmation = ToolConfirmation::new(ConfirmationDetails::Exec {
            title: "Confirm shell command".to_string(),
            command: command.to_string(),
            root_command: roots.join(", "),
        })
        .with_decision_hook(move |outcome| match outcome {
            ConfirmationOutcome::ProceedAlways => {
                info!(roots = ?roots, "Commands added to allow-list");
                allowed
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend(roots);
            }
            ConfirmationOutcome::ProceedAlwaysForTool => {
                info!("All shell commands trusted for this session");
                trust_all.store(true, Ordering::SeqCst);
            }
            _ => {}
        });
        Ok(Some(confirmation))
    }

    async fn execute(
        &self,
        args: &ToolArgs,
        ctx: &ExecutionContext,
    ) -> Result<ToolExecutionResult, ToolError> {
        let command = require_str(args, "command")?;
        let timeout = get_u64(args, "timeout_secs")
            .map(Duration::from_secs)
            .unwrap_or(self.timeout);

        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", command]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", command]);
            c
        };

        let dir = get_str(args, "working_dir")
            .map(|dir| resolve(self.working_dir.as_deref(), dir))
            .or_else(|| self.working_dir.clone());
        if let Some(dir) = &dir {
            if !dir.exists() {
                return Err(ToolError::not_found(format!(
                    "Working directory does not exist: {}",
                    dir.display()
                )));
            }
            if !dir.is_dir() {
                return Err(ToolError::invalid_argument(format!(
                    "'{}' is not a directory",
                    dir.display()
                )));
            }
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| ToolError::execution_failed(format!("Failed to spawn command: {}", e)))?;
        debug!(command, pid = child.id(), "Spawned command");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let run = async {
            let (stdout, stderr) = tokio::join!(stream_lines(stdout, ctx.output()), read_all(stderr));
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, stdout?, stderr?))
        };

        let (status, stdout, stderr) = tokio::select! {
            _ = ctx.cancel().cancelled() => {
                return Err(ToolError::cancelled("command interrupted"));
            }
            result = tokio::time::timeout(timeout, run) => match result {
                Ok(Ok(output)) => output,
                Ok(Err(e)) => {
                    return Err(ToolError::execution_failed(format!("Failed to wait for command: {}", e)));
                }
                Err(_) => {
                    return Err(ToolError::timeout(format!(
                        "Command timed out after {} seconds: {}",
                        timeout.as_secs(),
                        command
                    )));
                }
            },
        };

        let mut combined = stdout;
        if !stderr.is_empty() {
            if !combined.is_empty() {
                combined.push_str("\n--- stderr ---\n");
            }
            combined.push_str(&stderr);
        }
        if combined.len() > MAX_OUTPUT_SIZE {
            combined = truncate(&combined, MAX_OUTPUT_SIZE);
            combined.push_str("\n... (output truncated)");
        }

        // A non-zero exit is still a result the LLM should see.
        let exit_code = status.code().unwrap_or(-1);
        if status.success() {
            Ok(ToolExecutionResult::new(combined))
        } else {
            Ok(ToolExecutionResult::new(format!(
                "Command exited with code {}\n{}",
                exit_code, combined
            ))
            .with_display(format!("exit code {}", exit_code)))
        }
    }
}

/// Read stdout line by line, decoding lossily and publishing the tail as live output.
async fn stream_lines<R>(reader: Option<R>, output: &LiveOutput) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut collected = String::new();
    let Some(reader) = reader else {
        return Ok(collected);
    };

    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        collected.push_str(&String::from_utf8_lossy(&line));
        output.emit(tail(&collected, LIVE_OUTPUT_TAIL));
    }
    Ok(collected)
}

async fn read_all<R>(reader: Option<R>) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        reader.read_to_end(&mut buf).await?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Last `max` bytes of `s`, on a char boundary.
fn tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}
