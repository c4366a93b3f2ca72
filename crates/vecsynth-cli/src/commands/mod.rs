//! CLI command implementations.

pub mod controls;
pub mod devices;
pub mod play;
