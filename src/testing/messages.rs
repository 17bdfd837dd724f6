//! Commonly used assertion messages

pub const CURRENT_EXECUTABLE_SET: &str = "Current executable set successfully";

pub const PROCESS_IS_VALID: &str = "Process is valid";

pub const PROCESS_KILLED: &str = "Process is killed successfully";

pub const RUN_SUCCEEDED: &str = "Process is launched successfully";

pub const RUN_COMPLETED: &str = "Process exited successfully";

pub const BREAKPOINT_CREATED: &str = "Breakpoint created successfully";

pub const BREAKPOINT_PENDING_CREATED: &str = "Pending breakpoint created successfully";

pub const BREAKPOINT_HIT_ONCE: &str = "Breakpoint resolved with hit count = 1";

pub const STOPPED_DUE_TO_BREAKPOINT: &str = "Process state is stopped due to breakpoint";

pub const STOPPED_DUE_TO_STEP_IN: &str = "Process state is stopped due to step in";

pub const DATA_TYPES_DISPLAYED_CORRECTLY: &str = "Data type(s) displayed correctly";

pub const VALID_BREAKPOINT: &str = "Got a valid breakpoint";

pub const VALID_FILESPEC: &str = "Got a valid filespec";

pub const VALID_PROCESS: &str = "Got a valid process";

pub const VALID_TARGET: &str = "Got a valid target";

pub const VARIABLES_DISPLAYED_CORRECTLY: &str = "Variable(s) displayed correctly";

/// Generic message for a command that should have succeeded
pub fn cmd_msg(command: &str) -> String {
    format!("Command '{}' returns successfully", command)
}
