//! Error types for the debugger test harness
//!
//! Setup faults abort a test, assertion failures are surfaced to the test
//! framework, and configuration errors stop a load without a partial result.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Setup Faults ===
    #[error("Test sessions must name their test directory; got an empty identifier")]
    MissingTestDir,

    #[error("Invalid debugger instance")]
    InvalidDebugger,

    #[error("Could not get the command interpreter")]
    NoCommandInterpreter,

    #[error("Bad command parameter encountered: command is empty")]
    EmptyCommand,

    // === Assertion Failures ===
    #[error("Test assertion failed: {0}")]
    TestAssertion(String),

    // === Stop Reasons ===
    #[error("Unknown stop reason name '{0}'")]
    UnknownStopReasonName(String),

    #[error("Unknown stop reason code {0}")]
    UnknownStopReasonCode(i32),

    // === Engine Errors ===
    #[error("Debugger engine error: {0}")]
    Engine(String),

    // === Build Errors ===
    #[error("Don't know how to build {kind} on {platform}")]
    UnsupportedBuild { kind: String, platform: String },

    #[error("Command '{command}' exited with code {code:?}: {output}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an unsupported build error
    pub fn unsupported_build(kind: impl ToString, platform: impl ToString) -> Self {
        Self::UnsupportedBuild {
            kind: kind.to_string(),
            platform: platform.to_string(),
        }
    }

    /// Create a test assertion error
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::TestAssertion(message.into())
    }

    /// Whether this error is an assertion failure rather than a fault
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::TestAssertion(_))
    }
}
