//! Utility functions.

pub mod env;

pub use env::should_use_color;
