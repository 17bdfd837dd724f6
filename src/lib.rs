//! Debugger test harness
//!
//! Drives a debugger through its command interpreter on behalf of tests:
//! per-test session setup and teardown, command dispatch with launch retry,
//! expect-style output matching, and breakpoint polling. Per-directory test
//! configuration is loaded from `testing.toml`.

pub mod build;
pub mod cli;
pub mod commands;
pub mod common;
pub mod engine;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, HarnessEnv, Result, TestingConfig};
pub use engine::{CommandReturn, StopReason};
pub use testing::{Expectation, PollPolicy, RunOptions, TestSession};
