//! Debugger engine boundary
//!
//! The harness never resolves breakpoints or controls processes itself. It
//! talks to an engine through these traits: a debugger owning a textual
//! command interpreter, and process/thread/frame handles for inspecting the
//! inferior.

pub mod scripted;
mod stop_reason;

pub use stop_reason::StopReason;

use crate::common::Result;

/// Outcome of one interpreter command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandReturn {
    succeeded: bool,
    output: String,
    error: String,
}

impl CommandReturn {
    /// A successful result carrying `output`
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            output: output.into(),
            error: String::new(),
        }
    }

    /// A failed result carrying `error`
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            output: String::new(),
            error: error.into(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    /// Reset to an empty, unsuccessful state before reuse
    pub fn clear(&mut self) {
        self.succeeded = false;
        self.output.clear();
        self.error.clear();
    }

    pub fn set_status(&mut self, succeeded: bool) {
        self.succeeded = succeeded;
    }

    pub fn append_output(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn append_error(&mut self, text: &str) {
        self.error.push_str(text);
    }
}

/// A debugger instance
pub trait Debugger: Send {
    fn is_valid(&self) -> bool;

    /// Switch between asynchronous and synchronous execution
    fn set_async(&mut self, async_mode: bool);

    fn is_async(&self) -> bool;

    /// Handle to the command interpreter, if the debugger has one
    fn command_interpreter(&self) -> Option<Box<dyn CommandInterpreter>>;
}

/// Parses and executes textual debugger commands
pub trait CommandInterpreter: Send {
    /// Execute `command`, filling `result` with its status and output
    fn handle_command(&mut self, command: &str, result: &mut CommandReturn);
}

/// The inferior process
pub trait Process: Send {
    fn is_valid(&self) -> bool;

    fn kill(&mut self) -> Result<()>;

    /// Continue execution from the current stop
    fn resume(&mut self) -> Result<()>;

    fn thread_at_index(&self, index: usize) -> Option<Box<dyn Thread>>;
}

/// A thread of the inferior
pub trait Thread: Send {
    fn stop_reason(&self) -> StopReason;

    fn frame_at_index(&self, index: usize) -> Option<Box<dyn Frame>>;
}

/// A stack frame
pub trait Frame: Send {
    /// Name of the function executing in this frame
    fn function_name(&self) -> Option<String>;
}

/// A variable or expression value, bound to the frame it was read from
pub trait Value {
    fn name(&self) -> &str;
    fn type_name(&self) -> &str;
    fn byte_size(&self) -> usize;
    fn num_children(&self) -> usize;
    fn value(&self) -> Option<String>;
    fn summary(&self) -> Option<String>;
    fn is_pointer_type(&self) -> bool;
    fn location(&self) -> String;
}
