//! Argument accessors shared by the built-in tools.

use conductor_domain::{ToolArgs, ToolError};
use std::path::{Path, PathBuf};

pub(crate) fn get_str<'a>(args: &'a ToolArgs, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}

pub(crate) fn require_str<'a>(args: &'a ToolArgs, key: &str) -> Result<&'a str, ToolError> {
    get_str(args, key)
        .ok_or_else(|| ToolError::invalid_argument(format!("Missing required argument: {}", key)))
}

pub(crate) fn get_u64(args: &ToolArgs, key: &str) -> Option<u64> {
    args.get(key).and_then(|v| v.as_u64())
}

pub(crate) fn get_bool(args: &ToolArgs, key: &str) -> Option<bool> {
    args.get(key).and_then(|v| v.as_bool())
}

/// Resolve `path` against `base` unless it is already absolute.
pub(crate) fn resolve(base: Option<&Path>, path: &str) -> PathBuf {
    let path = Path::new(path);
    match base {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let mut args = ToolArgs::new();
        args.insert("path".into(), json!("a.txt"));
        args.insert("limit".into(), json!(5));
        args.insert("create_dirs".into(), json!(true));

        assert_eq!(get_str(&args, "path"), Some("a.txt"));
        assert_eq!(get_u64(&args, "limit"), Some(5));
        assert_eq!(get_bool(&args, "create_dirs"), Some(true));
        assert_eq!(
            require_str(&args, "content").unwrap_err().code,
            ToolError::INVALID_ARGUMENT
        );
    }

    #[test]
    fn test_resolve() {
        let base = Path::new("/work");
        assert_eq!(resolve(Some(base), "src/lib.rs"), PathBuf::from("/work/src/lib.rs"));
        assert_eq!(resolve(Some(base), "/etc/hosts"), PathBuf::from("/etc/hosts"));
        assert_eq!(resolve(None, "a"), PathBuf::from("a"));
    }
}
