//! Scripted in-memory engine
//!
//! Implements the engine traits with canned replies so harness code can be
//! exercised without a real debugger. Handles are cheap clones sharing one
//! state, the same way engine handles refer to one underlying object.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{CommandInterpreter, CommandReturn, Debugger, Frame, Process, StopReason, Thread, Value};
use crate::common::{Error, Result};

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug)]
struct DebuggerState {
    valid: bool,
    async_mode: bool,
    has_interpreter: bool,
    /// Queued replies per command; the last one repeats
    replies: HashMap<String, VecDeque<CommandReturn>>,
    history: Vec<String>,
}

/// Debugger answering commands from a script
#[derive(Debug, Clone)]
pub struct ScriptedDebugger {
    state: Arc<Mutex<DebuggerState>>,
}

impl Default for ScriptedDebugger {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedDebugger {
    /// A valid, asynchronous debugger with an interpreter and no replies
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(DebuggerState {
                valid: true,
                async_mode: true,
                has_interpreter: true,
                replies: HashMap::new(),
                history: Vec::new(),
            })),
        }
    }

    /// Report the handle as invalid
    pub fn invalid(self) -> Self {
        lock(&self.state).valid = false;
        self
    }

    /// Refuse to hand out a command interpreter
    pub fn without_interpreter(self) -> Self {
        lock(&self.state).has_interpreter = false;
        self
    }

    /// Queue a reply for `command`
    ///
    /// Replies are consumed in order; once one remains it answers every
    /// further dispatch. Commands with no reply fail as unknown commands.
    pub fn reply(&self, command: &str, reply: CommandReturn) -> &Self {
        lock(&self.state)
            .replies
            .entry(command.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Every command dispatched so far, in order
    pub fn history(&self) -> Vec<String> {
        lock(&self.state).history.clone()
    }

    /// Number of times `command` was dispatched
    pub fn dispatch_count(&self, command: &str) -> usize {
        lock(&self.state)
            .history
            .iter()
            .filter(|issued| issued.as_str() == command)
            .count()
    }
}

impl Debugger for ScriptedDebugger {
    fn is_valid(&self) -> bool {
        lock(&self.state).valid
    }

    fn set_async(&mut self, async_mode: bool) {
        lock(&self.state).async_mode = async_mode;
    }

    fn is_async(&self) -> bool {
        lock(&self.state).async_mode
    }

    fn command_interpreter(&self) -> Option<Box<dyn CommandInterpreter>> {
        if !lock(&self.state).has_interpreter {
            return None;
        }
        Some(Box::new(ScriptedInterpreter {
            state: Arc::clone(&self.state),
        }))
    }
}

/// Interpreter handle of a [`ScriptedDebugger`]
#[derive(Debug, Clone)]
pub struct ScriptedInterpreter {
    state: Arc<Mutex<DebuggerState>>,
}

impl CommandInterpreter for ScriptedInterpreter {
    fn handle_command(&mut self, command: &str, result: &mut CommandReturn) {
        let mut state = lock(&self.state);
        state.history.push(command.to_string());
        result.clear();

        let reply = match state.replies.get_mut(command) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match reply {
            Some(reply) => {
                result.set_status(reply.succeeded());
                result.append_output(reply.output());
                result.append_error(reply.error());
            }
            None => {
                let verb = command.split_whitespace().next().unwrap_or(command);
                result.append_error(&format!("error: '{}' is not a valid command.\n", verb));
            }
        }
    }
}

/// Where a scripted process sits after a stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub reason: StopReason,
    pub function: Option<String>,
}

impl Stop {
    pub fn new(reason: StopReason, function: Option<&str>) -> Self {
        Self {
            reason,
            function: function.map(str::to_string),
        }
    }

    /// A breakpoint stop inside `function`
    pub fn breakpoint(function: &str) -> Self {
        Self::new(StopReason::Breakpoint, Some(function))
    }
}

#[derive(Debug)]
struct ProcessState {
    valid: bool,
    killed: bool,
    kill_error: Option<String>,
    current: Stop,
    pending: VecDeque<Stop>,
    resumes: usize,
}

/// Process walking through a fixed sequence of stops
///
/// The first stop is current at creation; each resume advances to the
/// next, staying on the last one when the sequence runs out.
#[derive(Debug, Clone)]
pub struct ScriptedProcess {
    state: Arc<Mutex<ProcessState>>,
}

impl ScriptedProcess {
    pub fn new(stops: impl IntoIterator<Item = Stop>) -> Self {
        let mut pending: VecDeque<Stop> = stops.into_iter().collect();
        let current = pending
            .pop_front()
            .unwrap_or_else(|| Stop::new(StopReason::Invalid, None));

        Self {
            state: Arc::new(Mutex::new(ProcessState {
                valid: true,
                killed: false,
                kill_error: None,
                current,
                pending,
                resumes: 0,
            })),
        }
    }

    /// Make `kill` fail with `message`
    pub fn failing_kill(self, message: &str) -> Self {
        lock(&self.state).kill_error = Some(message.to_string());
        self
    }

    pub fn was_killed(&self) -> bool {
        lock(&self.state).killed
    }

    pub fn resume_count(&self) -> usize {
        lock(&self.state).resumes
    }
}

impl Process for ScriptedProcess {
    fn is_valid(&self) -> bool {
        lock(&self.state).valid
    }

    fn kill(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        if let Some(message) = &state.kill_error {
            return Err(Error::Engine(message.clone()));
        }
        state.killed = true;
        state.valid = false;
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        if state.killed {
            return Err(Error::Engine("process is not alive".to_string()));
        }
        state.resumes += 1;
        if let Some(next) = state.pending.pop_front() {
            state.current = next;
        }
        Ok(())
    }

    fn thread_at_index(&self, index: usize) -> Option<Box<dyn Thread>> {
        let state = lock(&self.state);
        if index != 0 || !state.valid {
            return None;
        }
        Some(Box::new(ScriptedThread {
            stop: state.current.clone(),
        }))
    }
}

/// Snapshot of the process's only thread at one stop
#[derive(Debug, Clone)]
pub struct ScriptedThread {
    stop: Stop,
}

impl Thread for ScriptedThread {
    fn stop_reason(&self) -> StopReason {
        self.stop.reason
    }

    fn frame_at_index(&self, index: usize) -> Option<Box<dyn Frame>> {
        if index != 0 {
            return None;
        }
        Some(Box::new(ScriptedFrame {
            function: self.stop.function.clone(),
        }))
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedFrame {
    function: Option<String>,
}

impl Frame for ScriptedFrame {
    fn function_name(&self) -> Option<String> {
        self.function.clone()
    }
}

/// Plain value record
#[derive(Debug, Clone, Default)]
pub struct ScriptedValue {
    pub name: String,
    pub type_name: String,
    pub byte_size: usize,
    pub num_children: usize,
    pub value: Option<String>,
    pub summary: Option<String>,
    pub is_pointer: bool,
    pub location: String,
}

impl Value for ScriptedValue {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn byte_size(&self) -> usize {
        self.byte_size
    }

    fn num_children(&self) -> usize {
        self.num_children
    }

    fn value(&self) -> Option<String> {
        self.value.clone()
    }

    fn summary(&self) -> Option<String> {
        self.summary.clone()
    }

    fn is_pointer_type(&self) -> bool {
        self.is_pointer
    }

    fn location(&self) -> String {
        self.location.clone()
    }
}
