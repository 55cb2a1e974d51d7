//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for batch results
///
/// This is a domain concept representing how the output should be formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable status lines (default)
    #[default]
    Text,
    /// JSON array of completed calls
    Json,
}
