//! Formatting of batch results

pub mod console;
pub mod formatter;
