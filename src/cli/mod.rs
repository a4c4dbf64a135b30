//! Command line interface for the simdex tool.

pub mod args;
pub mod commands;

pub use args::*;
pub use commands::*;
