//! Tool Registry
//!
//! [`LocalToolRegistry`] maps tool names to [`Tool`] implementations and
//! implements [`ToolRegistryPort`] for the scheduler.
//!
//! # Usage
//!
//! ```ignore
//! use conductor_infrastructure::tools::{LocalToolRegistry, ReadFileTool};
//!
//! let registry = LocalToolRegistry::new()
//!     .register(ReadFileTool::default())
//!     .with_alias("cat", "read_file");
//!
//! assert!(registry.has_tool("read_file"));
//! assert!(registry.has_tool("cat"));
//! ```
//!
//! # Alias Resolution
//!
//! A registered name always wins over an alias of the same name. Aliases
//! whose target is not registered resolve to nothing and are reported by
//! [`LocalToolRegistry::dangling_aliases`].

use super::{BuiltinToolOptions, ReadFileTool, RunCommandTool, WriteFileTool};
use conductor_application::{Tool, ToolRegistryPort};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// In-process tool registry with alias support
#[derive(Default, Clone)]
pub struct LocalToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    aliases: BTreeMap<String, String>,
}

impl LocalToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `read_file`, `write_file` and `run_command`
    pub fn builtin(options: &BuiltinToolOptions) -> Self {
        Self::new()
            .register(ReadFileTool::new(options.working_dir.clone()))
            .register(WriteFileTool::new(options.working_dir.clone()))
            .register(
                RunCommandTool::new(options.working_dir.clone(), options.command_timeout)
                    .with_trusted(options.trusted_commands.iter().cloned()),
            )
    }

    /// Register a tool under its own name, replacing any previous one
    pub fn register<T: Tool + 'static>(self, tool: T) -> Self {
        self.register_arc(Arc::new(tool))
    }

    /// Register a tool (Arc version)
    pub fn register_arc(mut self, tool: Arc<dyn Tool>) -> Self {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::debug!(tool = %name, "Replaced registered tool");
        } else {
            tracing::debug!(tool = %name, "Registered tool");
        }
        self
    }

    /// Add an alternative name for a registered tool
    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), target.into());
        self
    }

    /// Add several aliases at once
    pub fn with_aliases<I, A, T>(self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (A, T)>,
        A: Into<String>,
        T: Into<String>,
    {
        aliases
            .into_iter()
            .fold(self, |registry, (alias, target)| registry.with_alias(alias, target))
    }

    /// Canonical name for `name`, following an alias if needed
    pub fn resolve_name<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.tools.contains_key(name) {
            return Some(name);
        }
        self.aliases
            .get(name)
            .map(String::as_str)
            .filter(|target| self.tools.contains_key(*target))
    }

    /// Aliases whose target is not registered, as `(alias, target)`
    pub fn dangling_aliases(&self) -> Vec<(&str, &str)> {
        self.aliases
            .iter()
            .filter(|(_, target)| !self.tools.contains_key(*target))
            .map(|(alias, target)| (alias.as_str(), target.as_str()))
            .collect()
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl ToolRegistryPort for LocalToolRegistry {
    fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let resolved = self.resolve_name(name)?;
        if resolved != name {
            tracing::trace!(alias = name, tool = resolved, "Resolved tool alias");
        }
        self.tools.get(resolved).cloned()
    }

    fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{READ_FILE, RUN_COMMAND, WRITE_FILE};

    #[test]
    fn test_builtin_registry() {
        let registry = LocalToolRegistry::builtin(&BuiltinToolOptions::default());

        assert_eq!(registry.len(), 3);
        assert!(registry.has_tool(READ_FILE));
        assert!(registry.has_tool(WRITE_FILE));
        assert!(registry.has_tool(RUN_COMMAND));
        assert_eq!(registry.tool_names(), vec![READ_FILE, RUN_COMMAND, WRITE_FILE]);
    }

    #[test]
    fn test_unknown_tool() {
        let registry = LocalToolRegistry::builtin(&BuiltinToolOptions::default());
        assert!(registry.get_tool("unknown_tool").is_none());
    }

    #[test]
    fn test_alias_resolution() {
        let registry = LocalToolRegistry::builtin(&BuiltinToolOptions::default())
            .with_aliases([("bash", RUN_COMMAND), ("grep", "grep_search")]);

        let tool = registry.get_tool("bash").unwrap();
        assert_eq!(tool.name(), RUN_COMMAND);
        assert_eq!(registry.resolve_name("bash"), Some(RUN_COMMAND));
        assert!(registry.get_tool("grep").is_none());
        assert_eq!(registry.dangling_aliases(), vec![("grep", "grep_search")]);
    }

    #[test]
    fn test_registered_name_wins_over_alias() {
        let registry = LocalToolRegistry::new()
            .register(ReadFileTool::default())
            .register(WriteFileTool::default())
            .with_alias(READ_FILE, WRITE_FILE);

        assert_eq!(registry.get_tool(READ_FILE).unwrap().name(), READ_FILE);
    }

    #[test]
    fn test_trusted_commands_seeded() {
        let options = BuiltinToolOptions {
            trusted_commands: vec!["ls".to_string()],
            ..Default::default()
        };
        let registry = LocalToolRegistry::builtin(&options);
        assert!(registry.get_tool(RUN_COMMAND).is_some());
    }
}
