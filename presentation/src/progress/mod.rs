//! Progress reporting for batch execution

pub mod renderer;
