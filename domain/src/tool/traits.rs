//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async `Tool` port is defined in the application layer (ports).

use super::entities::{ToolArgs, ToolDefinition};

/// Validator for tool arguments
///
/// This is a pure domain trait that validates arguments
/// against a definition without any I/O operations.
pub trait ToolValidator {
    /// Validate call arguments against a tool definition
    fn validate(&self, args: &ToolArgs, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, args: &ToolArgs, definition: &ToolDefinition) -> Result<(), String> {
        for param in &definition.parameters {
            if param.required && !args.contains_key(&param.name) {
                return Err(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param.name, definition.name
                ));
            }
        }

        for arg_name in args.keys() {
            if !definition.parameters.iter().any(|p| &p.name == arg_name) {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                ));
            }
        }

        Ok(())
    }
}
