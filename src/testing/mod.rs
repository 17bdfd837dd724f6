//! Test session harness
//!
//! Drives a debugger through its command interpreter and asserts against
//! command output and inferior state. Sessions are created per test with
//! [`TestSession::setup`] and released with [`TestSession::teardown`].

mod discovery;
mod matching;
pub mod messages;
mod polling;
mod session;

pub use discovery::discover_tests;
pub use matching::{match_output, Expectation, OutputMatch};
pub use polling::{break_at_function, PollPolicy};
pub use session::{describe_value, is_launch_command, RunOptions, TestSession};
