//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! implement. The scheduler consumes [`tool`], [`tool_registry`] and
//! [`cancellation`], and drives [`tool_call_observer`].

pub mod cancellation;
pub mod tool;
pub mod tool_call_observer;
pub mod tool_registry;
