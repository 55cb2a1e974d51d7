//! File operation tools: read_file, write_file

use super::args::{get_bool, get_str, get_u64, require_str, resolve};
use async_trait::async_trait;
use conductor_application::{ExecutionContext, Tool, ToolConfirmation};
use conductor_domain::{
    ConfirmationDetails, ToolArgs, ToolDefinition, ToolError, ToolExecutionResult, ToolParameter,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Tool name constants
pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";

/// Maximum file size to read (10 MB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

fn io_error(err: std::io::Error, path: &Path, action: &str) -> ToolError {
    match err.kind() {
        ErrorKind::NotFound => ToolError::not_found(path.display().to_string()),
        ErrorKind::PermissionDenied => ToolError::permission_denied(path.display().to_string()),
        _ => ToolError::execution_failed(format!("Failed to {} file: {}", action, err)),
    }
}

// ==================== read_file ====================

/// Reads a UTF-8 text file, optionally a window of lines
#[derive(Debug, Clone, Default)]
pub struct ReadFileTool {
    root: Option<PathBuf>,
}

impl ReadFileTool {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        READ_FILE
    }

    fn display_name(&self) -> &str {
        "ReadFile"
    }

    fn description(&self) -> &str {
        "Read the contents of a file at the specified path"
    }

    fn definition(&self) -> Option<ToolDefinition> {
        Some(
            ToolDefinition::new(READ_FILE, self.description())
                .with_parameter(
                    ToolParameter::new("path", "Path to the file to read", true).with_type("path"),
                )
                .with_parameter(
                    ToolParameter::new("offset", "Line number to start reading from (0-indexed)", false)
                        .with_type("number"),
                )
                .with_parameter(
                    ToolParameter::new("limit", "Maximum number of lines to read", false)
                        .with_type("number"),
                ),
        )
    }

    fn describe_invocation(&self, args: &ToolArgs) -> String {
        let path = get_str(args, "path").unwrap_or("?");
        match (get_u64(args, "offset"), get_u64(args, "limit")) {
            (None, None) => path.to_string(),
            (offset, limit) => format!(
                "{} (from line {}, {} lines)",
                path,
                offset.unwrap_or(0),
                limit.map_or_else(|| "all".to_string(), |l| l.to_string())
            ),
        }
    }

    async fn execute(
        &self,
        args: &ToolArgs,
        _ctx: &ExecutionContext,
    ) -> Result<ToolExecutionResult, ToolError> {
        let path = resolve(self.root.as_deref(), require_str(args, "path")?);

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| io_error(e, &path, "inspect"))?;
        if !metadata.is_file() {
            return Err(ToolError::invalid_argument(format!(
                "'{}' is not a file",
                path.display()
            )));
        }
        if metadata.len() > MAX_READ_SIZE {
            return Err(ToolError::invalid_argument(format!(
                "File too large ({} bytes). Maximum size is {} bytes",
                metadata.len(),
                MAX_READ_SIZE
            )));
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| io_error(e, &path, "read"))?;

        let offset = get_u64(args, "offset").unwrap_or(0) as usize;
        let limit = get_u64(args, "limit").map(|l| l as usize);
        let total = content.lines().count();

        let output = if offset > 0 || limit.is_some() {
            content
                .lines()
                .skip(offset)
                .take(limit.unwrap_or(usize::MAX))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            content
        };

        let shown = if output.is_empty() { 0 } else { output.lines().count() };
        debug!(path = %path.display(), lines = shown, "Read file");
        Ok(ToolExecutionResult::new(output)
            .with_display(format!("Read {} of {} lines from {}", shown, total, path.display())))
    }
}

// ==================== write_file ====================

/// Writes a file after showing the human a line diff
#[derive(Debug, Clone, Default)]
pub struct WriteFileTool {
    root: Option<PathBuf>,
}

impl WriteFileTool {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        WRITE_FILE
    }

    fn display_name(&self) -> &str {
        "WriteFile"
    }

    fn description(&self) -> &str {
        "Write content to a file at the specified path. Creates the file if it doesn't exist, or overwrites if it does."
    }

    fn definition(&self) -> Option<ToolDefinition> {
        Some(
            ToolDefinition::new(WRITE_FILE, self.description())
                .with_parameter(
                    ToolParameter::new("path", "Path to the file to write", true).with_type("path"),
                )
                .with_parameter(
                    ToolParameter::new("content", "Content to write to the file", true)
                        .with_type("string"),
                )
                .with_parameter(
                    ToolParameter::new(
                        "create_dirs",
                        "Create parent directories if they don't exist",
                        false,
                    )
                    .with_type("boolean"),
                ),
        )
    }

    fn describe_invocation(&self, args: &ToolArgs) -> String {
        get_str(args, "path").unwrap_or("?").to_string()
    }

    async fn should_confirm_execute(
        &self,
        args: &ToolArgs,
        _cancel: &CancellationToken,
    ) -> Result<Option<ToolConfirmation>, ToolError> {
        let path = resolve(self.root.as_deref(), require_str(args, "path")?);
        let content = require_str(args, "content")?;

        let current = match tokio::fs::read_to_string(&path).await {
            Ok(current) => current,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(io_error(e, &path, "read")),
        };

        Ok(Some(ToolConfirmation::new(ConfirmationDetails::Edit {
            title: format!("Confirm write: {}", path.display()),
            file_path: path.display().to_string(),
            diff: line_diff(&current, content),
        })))
    }

    async fn execute(
        &self,
        args: &ToolArgs,
        _ctx: &ExecutionContext,
    ) -> Result<ToolExecutionResult, ToolError> {
        let path = resolve(self.root.as_deref(), require_str(args, "path")?);
        let content = require_str(args, "content")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
            && !parent.exists()
        {
            if get_bool(args, "create_dirs").unwrap_or(false) {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    ToolError::execution_failed(format!("Failed to create parent directories: {}", e))
                })?;
            } else {
                return Err(ToolError::not_found(format!(
                    "Parent directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| io_error(e, &path, "write"))?;

        debug!(path = %path.display(), bytes = content.len(), "Wrote file");
        Ok(ToolExecutionResult::new(format!(
            "Successfully wrote {} bytes to {}",
            content.len(),
            path.display()
        )))
    }
}

/// Minimal line diff: the changed middle between the common prefix and suffix.
fn line_diff(old: &str, new: &str) -> String {
    let old: Vec<&str> = old.lines().collect();
    let new: Vec<&str> = new.lines().collect();

    let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let removed = &old[prefix..old.len() - suffix];
    let added = &new[prefix..new.len() - suffix];
    if removed.is_empty() && added.is_empty() {
        return "(no changes)".to_string();
    }

    let mut diff = format!("@@ line {} @@\n", prefix + 1);
    for line in removed {
        diff.push_str("- ");
        diff.push_str(line);
        diff.push('\n');
    }
    for line in added {
        diff.push_str("+ ");
        diff.push_str(line);
        diff.push('\n');
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_application::LiveOutput;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ctx() -> ExecutionContext {
        ExecutionContext::new(CancellationToken::new(), LiveOutput::disabled())
    }

    fn args(pairs: &[(&str, serde_json::Value)]) -> ToolArgs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_read_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Hello, World!").unwrap();
        let path = temp_file.path().to_str().unwrap();

        let result = ReadFileTool::default()
            .execute(&args(&[("path", json!(path))]), &ctx())
            .await
            .unwrap();
        assert!(result.llm_content.contains("Hello, World!"));
    }

    #[tokio::test]
    async fn test_read_file_with_window() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Line 1\nLine 2\nLine 3\nLine 4\nLine 5").unwrap();
        let path = temp_file.path().to_str().unwrap();

        let result = ReadFileTool::default()
            .execute(
                &args(&[("path", json!(path)), ("offset", json!(1)), ("limit", json!(2))]),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result.llm_content, "Line 2\nLine 3");
        assert!(result.return_display.unwrap().starts_with("Read 2 of 5 lines"));
    }

    #[tokio::test]
    async fn test_read_file_not_found() {
        let err = ReadFileTool::default()
            .execute(&args(&[("path", json!("/nonexistent/file.txt"))]), &ctx())
            .await
            .unwrap_err();
        assert_eq!(err.code, ToolError::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_read_file_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "rooted").unwrap();

        let tool = ReadFileTool::new(Some(dir.path().to_path_buf()));
        let result = tool
            .execute(&args(&[("path", json!("notes.txt"))]), &ctx())
            .await
            .unwrap();
        assert_eq!(result.llm_content, "rooted");
    }

    #[tokio::test]
    async fn test_write_file_confirmation_shows_diff() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "one\ntwo\nthree\n").unwrap();

        let confirmation = WriteFileTool::default()
            .should_confirm_execute(
                &args(&[
                    ("path", json!(path.to_str().unwrap())),
                    ("content", json!("one\n2\nthree\n")),
                ]),
                &CancellationToken::new(),
            )
            .await
            .unwrap()
            .unwrap();

        match confirmation.details {
            ConfirmationDetails::Edit { diff, file_path, .. } => {
                assert_eq!(diff, "@@ line 2 @@\n- two\n+ 2\n");
                assert!(file_path.ends_with("a.txt"));
            }
            other => panic!("expected edit confirmation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.txt");

        let result = WriteFileTool::default()
            .execute(
                &args(&[
                    ("path", json!(path.to_str().unwrap())),
                    ("content", json!("Test content")),
                ]),
                &ctx(),
            )
            .await
            .unwrap();
        assert!(result.llm_content.contains("12 bytes"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Test content");
    }

    #[tokio::test]
    async fn test_write_file_create_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("test.txt");
        let path_str = path.to_str().unwrap();

        let err = WriteFileTool::default()
            .execute(
                &args(&[("path", json!(path_str)), ("content", json!("x"))]),
                &ctx(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ToolError::NOT_FOUND);

        WriteFileTool::default()
            .execute(
                &args(&[
                    ("path", json!(path_str)),
                    ("content", json!("x")),
                    ("create_dirs", json!(true)),
                ]),
                &ctx(),
            )
            .await
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_line_diff() {
        assert_eq!(line_diff("a\nb", "a\nb"), "(no changes)");
        assert_eq!(line_diff("", "new"), "@@ line 1 @@\n+ new\n");
        assert_eq!(line_diff("a\nb\nc", "a\nc"), "@@ line 2 @@\n- b\n");
    }
}
