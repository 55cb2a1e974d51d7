//! Human-in-the-loop confirmation

pub mod confirmer;

pub use confirmer::{InteractiveConfirmer, parse_decision};
