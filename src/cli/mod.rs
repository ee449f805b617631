//! CLI argument parsing and command dispatch.

pub mod args;
pub mod lookup;

pub use args::{Cli, OutputFormat};
