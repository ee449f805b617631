//! Shared helpers for integration tests.
//!
//! - `log_capture`: record tracing events emitted during a test

pub mod log_capture;
