//! Tool registry port
//!
//! Resolves a tool name to a concrete [`Tool`]. The scheduler receives a
//! registry at construction time; there is no process-wide registry.

use super::tool::Tool;
use std::sync::Arc;

/// Port for looking up tools by name
pub trait ToolRegistryPort: Send + Sync {
    /// Resolve a tool, or `None` if nothing is registered under `name`
    fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>>;

    /// Names of all registered tools
    fn tool_names(&self) -> Vec<String>;

    fn has_tool(&self, name: &str) -> bool {
        self.get_tool(name).is_some()
    }
}
