//! Test session lifecycle
//!
//! A [`TestSession`] is created by `setup`, driven by any number of
//! commands, and consumed by `teardown`. It owns the debugger handle, the
//! command interpreter, the last command result and the inferior process
//! handle for the duration of one test.

use std::path::PathBuf;

use crate::common::logging::{trace_line, trace_match};
use crate::common::{Error, HarnessEnv, Result};
use crate::engine::{CommandInterpreter, CommandReturn, Debugger, Process, Value};

use super::matching::{match_output, Expectation, OutputMatch};
use super::messages::{cmd_msg, PROCESS_KILLED};
use super::polling::{break_at_function, PollPolicy};

/// Options for [`TestSession::run_cmd`]
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Assertion message used when the command fails
    pub msg: Option<String>,
    /// Fail the test when the command does not succeed
    pub check: bool,
    /// Echo the command and its output to stderr
    pub trace: bool,
    /// Record a successful launch so teardown kills the process
    pub set_cookie: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            msg: None,
            check: true,
            trace: false,
            set_cookie: true,
        }
    }
}

impl RunOptions {
    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    pub fn check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn set_cookie(mut self, set_cookie: bool) -> Self {
        self.set_cookie = set_cookie;
        self
    }
}

/// Whether `command` starts the inferior
pub fn is_launch_command(command: &str) -> bool {
    let command = command.trim_start();
    command.starts_with("run") || command.starts_with("process launch")
}

/// One test's debugger session
pub struct TestSession {
    test_dir: String,
    env: HarnessEnv,
    debugger: Box<dyn Debugger>,
    interpreter: Box<dyn CommandInterpreter>,
    result: CommandReturn,
    process: Option<Box<dyn Process>>,
    run_started: bool,
    saved_cwd: Option<PathBuf>,
}

impl std::fmt::Debug for TestSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestSession")
            .field("test_dir", &self.test_dir)
            .field("env", &self.env)
            .field("result", &self.result)
            .field("has_process", &self.process.is_some())
            .field("run_started", &self.run_started)
            .field("saved_cwd", &self.saved_cwd)
            .finish()
    }
}

impl TestSession {
    /// Prepare a session for the test living in `test_dir`
    ///
    /// When `env.test_root` is set the working directory moves to
    /// `<test_root>/<test_dir>` until teardown. The debugger is switched to
    /// synchronous mode.
    pub fn setup(test_dir: &str, env: HarnessEnv, mut debugger: Box<dyn Debugger>) -> Result<Self> {
        if test_dir.is_empty() {
            return Err(Error::MissingTestDir);
        }

        let saved_cwd = match &env.test_root {
            Some(root) => {
                let old = std::env::current_dir()?;
                let target = root.join(test_dir);
                std::env::set_current_dir(&target).map_err(|e| {
                    Error::Config(format!("Cannot enter test directory '{}': {}", target.display(), e))
                })?;
                Some(old)
            }
            None => None,
        };

        let restore = |saved: &Option<PathBuf>| {
            if let Some(dir) = saved {
                let _ = std::env::set_current_dir(dir);
            }
        };

        if !debugger.is_valid() {
            restore(&saved_cwd);
            return Err(Error::InvalidDebugger);
        }

        debugger.set_async(false);

        let Some(interpreter) = debugger.command_interpreter() else {
            restore(&saved_cwd);
            return Err(Error::NoCommandInterpreter);
        };

        tracing::info!(
            test_dir,
            max_launch_count = env.max_launch_count,
            time_wait = ?env.time_wait,
            "test session set up"
        );

        Ok(Self {
            test_dir: test_dir.to_string(),
            env,
            debugger,
            interpreter,
            result: CommandReturn::default(),
            process: None,
            run_started: false,
            saved_cwd,
        })
    }

    /// Like [`TestSession::setup`], reading settings from the process environment
    pub fn setup_from_env(test_dir: &str, debugger: Box<dyn Debugger>) -> Result<Self> {
        Self::setup(test_dir, HarnessEnv::from_env()?, debugger)
    }

    pub fn test_dir(&self) -> &str {
        &self.test_dir
    }

    pub fn env(&self) -> &HarnessEnv {
        &self.env
    }

    pub fn debugger(&self) -> &dyn Debugger {
        self.debugger.as_ref()
    }

    /// Result of the most recent command
    pub fn last_result(&self) -> &CommandReturn {
        &self.result
    }

    /// Whether a launch command succeeded and marked the process for teardown
    pub fn run_started(&self) -> bool {
        self.run_started
    }

    /// Global command tracing
    pub fn trace_enabled(&self) -> bool {
        self.env.trace
    }

    /// Hand a process launched through the engine API to the session
    ///
    /// Teardown kills it unless a launch command already marked the run.
    pub fn attach_process(&mut self, process: Box<dyn Process>) {
        self.process = Some(process);
    }

    pub fn process_mut(&mut self) -> Option<&mut (dyn Process + 'static)> {
        self.process.as_deref_mut()
    }

    /// Run `command` with default options, asserting success
    pub async fn run(&mut self, command: &str) -> Result<()> {
        self.run_cmd(command, RunOptions::default()).await
    }

    /// Ask the command interpreter to handle `command` and check its status
    ///
    /// Launch commands are retried up to `max_launch_count` times with a
    /// `time_wait` pause after each attempt.
    pub async fn run_cmd(&mut self, command: &str, opts: RunOptions) -> Result<()> {
        if command.is_empty() {
            return Err(Error::EmptyCommand);
        }

        let trace = opts.trace || self.env.trace;
        let launching = is_launch_command(command);
        let attempts = if launching { self.env.max_launch_count.max(1) } else { 1 };

        for attempt in 1..=attempts {
            self.interpreter.handle_command(command, &mut self.result);

            tracing::debug!(
                command,
                attempt,
                succeeded = self.result.succeeded(),
                "dispatched command"
            );

            if trace {
                trace_line("runCmd:", command);
                if self.result.succeeded() {
                    trace_line("output:", self.result.output());
                } else {
                    trace_line("error:", self.result.error());
                }
            }

            if launching {
                // Give the inferior time to settle before a possible retry
                tokio::time::sleep(self.env.time_wait).await;
            }

            if self.result.succeeded() {
                break;
            }
        }

        if launching {
            self.run_started = opts.set_cookie && self.result.succeeded();
        }

        if opts.check && !self.result.succeeded() {
            let msg = opts.msg.unwrap_or_else(|| cmd_msg(command));
            return Err(Error::assertion(with_detail(msg, self.result.error())));
        }

        Ok(())
    }

    /// Run `command` and match its output against `expectation`
    pub async fn expect(&mut self, command: &str, expectation: Expectation) -> Result<()> {
        let trace = expectation.trace || self.env.trace;

        self.run_cmd(command, RunOptions::default().trace(trace)).await?;

        // The prefix, when present, is always the first pattern checked
        let mut checking_start = expectation.start.is_some();
        let outcome = match_output(
            self.result.output(),
            expectation.start.as_deref(),
            &expectation.substrs,
            |pattern, matched| {
                if trace {
                    let label = if checking_start {
                        "Expecting start string:"
                    } else {
                        "Expecting sub string:"
                    };
                    trace_line(label, pattern);
                    trace_match(matched);
                }
                checking_start = false;
            },
        );

        match outcome {
            OutputMatch::Matched => Ok(()),
            miss => {
                let msg = expectation.msg.unwrap_or_else(|| cmd_msg(command));
                let detail = match miss {
                    OutputMatch::MissingStart(start) => format!("output does not start with '{}'", start),
                    OutputMatch::MissingSubstr(substr) => format!("output does not contain '{}'", substr),
                    OutputMatch::Matched => String::new(),
                };
                Err(Error::assertion(format!("{}: {}", msg, detail)))
            }
        }
    }

    /// Continue the attached process until it stops at a breakpoint in `func`
    ///
    /// Uses the default [`PollPolicy`]. Returns `Ok(false)` when the
    /// iteration ceiling is reached, or when no process is attached.
    pub async fn break_after_launch(&mut self, func: &str) -> Result<bool> {
        self.break_after_launch_with(func, PollPolicy::default()).await
    }

    pub async fn break_after_launch_with(&mut self, func: &str, policy: PollPolicy) -> Result<bool> {
        let trace = self.env.trace;
        match self.process_mut() {
            Some(process) => break_at_function(process, func, policy, trace).await,
            None => {
                tracing::warn!(func, "no process attached to poll");
                Ok(false)
            }
        }
    }

    /// Dump a value to stderr when tracing is enabled
    pub fn debug_value(&self, value: &dyn Value) {
        if !self.env.trace {
            return;
        }

        eprintln!("{}", describe_value(value));
    }

    /// Kill any process this test started, release the debugger and
    /// restore the working directory
    ///
    /// The directory is restored even when killing the process fails.
    pub async fn teardown(mut self) -> Result<()> {
        let kill_result = if self.run_started {
            self.run_started = false;
            let opts = RunOptions::default().msg(PROCESS_KILLED).check(false);
            if let Err(e) = self.run_cmd("process kill", opts).await {
                tracing::warn!(error = %e, "process kill command failed");
            }
            Ok(())
        } else {
            match self.process.take() {
                Some(mut process) if process.is_valid() => process
                    .kill()
                    .map_err(|e| Error::assertion(with_detail(PROCESS_KILLED.to_string(), &e.to_string()))),
                _ => Ok(()),
            }
        };
        self.process = None;

        let restore_result = match self.saved_cwd.take() {
            Some(dir) => std::env::set_current_dir(&dir).map_err(Error::from),
            None => Ok(()),
        };
        if let Err(e) = &restore_result {
            tracing::warn!(error = %e, "failed to restore working directory");
        }

        tracing::info!(test_dir = %self.test_dir, "test session torn down");

        kill_result.and(restore_result)
    }
}

impl Drop for TestSession {
    /// Best-effort cleanup for sessions that never reached `teardown`
    fn drop(&mut self) {
        if self.run_started {
            self.interpreter.handle_command("process kill", &mut self.result);
        } else if let Some(process) = self.process.as_deref_mut() {
            if process.is_valid() {
                if let Err(e) = process.kill() {
                    tracing::warn!(error = %e, "failed to kill process on drop");
                }
            }
        }

        if let Some(dir) = self.saved_cwd.take() {
            if let Err(e) = std::env::set_current_dir(&dir) {
                tracing::warn!(error = %e, dir = %dir.display(), "failed to restore working directory on drop");
            }
        }
    }
}

fn with_detail(msg: String, detail: &str) -> String {
    let detail = detail.trim();
    if detail.is_empty() {
        msg
    } else {
        format!("{} ({})", msg, detail)
    }
}

/// Multi-line description of a value, one attribute per line
pub fn describe_value(value: &dyn Value) -> String {
    let show = |v: Option<String>| v.unwrap_or_else(|| "None".to_string());
    format!(
        "{}:\n\tTypeName    -> {}\n\tByteSize    -> {}\n\tNumChildren -> {}\n\tValue       -> {}\n\tSummary     -> {}\n\tIsPtrType   -> {}\n\tLocation    -> {}",
        value.name(),
        value.type_name(),
        value.byte_size(),
        value.num_children(),
        show(value.value()),
        show(value.summary()),
        value.is_pointer_type(),
        value.location(),
    )
}
