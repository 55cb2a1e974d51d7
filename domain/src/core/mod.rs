//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] — domain-level errors
//! - [`string::truncate`] — UTF-8 safe truncation for previews
//! - [`time::current_timestamp`] — wall-clock milliseconds for call timing

pub mod error;
pub mod string;
pub mod time;
