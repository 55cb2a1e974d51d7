//! Application-level configuration.
//!
//! - [`SchedulerConfig`] — how the tool scheduler treats confirmations

pub mod scheduler_config;

pub use scheduler_config::SchedulerConfig;
