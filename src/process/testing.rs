//! Test doubles for code built on [`CommandRunner`]
//!
//! [`ScriptedRunner`] records every invocation and answers from a script, so
//! command sequences can be asserted without spawning `git` or `gh`.
//! [`RecordingProgress`] captures what an operation reported.

use super::{CommandRunner, Invocation};
use crate::error::{CommandFailure, Error, Result};
use crate::merge::MergeState;
use crate::progress::ProgressCallback;
use crate::types::RunResult;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone)]
enum Response {
    Output {
        exit_code: i32,
        stdout: String,
        stderr: String,
    },
    MissingTool,
}

/// Records every invocation and answers from a script.
///
/// A scripted response matches when the command line starts with its prefix
/// and is consumed on use; the earliest matching entry wins. Unmatched
/// invocations succeed with empty output.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    dry_run: AtomicBool,
    calls: Mutex<Vec<Invocation>>,
    responses: Mutex<Vec<(String, Response)>>,
}

impl ScriptedRunner {
    /// A runner that answers every call with success
    pub fn new() -> Self {
        Self::default()
    }

    /// Report dry-run mode to callers
    #[must_use]
    pub fn dry_run(self) -> Self {
        self.dry_run.store(true, Ordering::Relaxed);
        self
    }

    // === Response scripting ===

    fn script(&self, prefix: &str, response: Response) -> &Self {
        lock(&self.responses).push((prefix.to_string(), response));
        self
    }

    /// Next call starting with `prefix` prints `stdout` and succeeds
    pub fn respond(&self, prefix: &str, stdout: &str) -> &Self {
        self.script(
            prefix,
            Response::Output {
                exit_code: 0,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        )
    }

    /// Next call starting with `prefix` prints `stderr` and exits 1
    pub fn fail(&self, prefix: &str, stderr: &str) -> &Self {
        self.script(
            prefix,
            Response::Output {
                exit_code: 1,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        )
    }

    /// Next call starting with `prefix` behaves as if the tool is not installed
    pub fn missing_tool(&self, prefix: &str) -> &Self {
        self.script(prefix, Response::MissingTool)
    }

    // === Call inspection ===

    /// Every invocation, in order
    pub fn calls(&self) -> Vec<Invocation> {
        lock(&self.calls).clone()
    }

    /// Every invocation as a shell command line
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::command_line).collect()
    }

    /// Command lines of invocations that change state
    pub fn mutating_command_lines(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter(|inv| inv.mutating)
            .map(Invocation::command_line)
            .collect()
    }

    /// The first invocation whose command line starts with `prefix`
    pub fn find(&self, prefix: &str) -> Option<Invocation> {
        self.calls()
            .into_iter()
            .find(|inv| inv.command_line().starts_with(prefix))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunResult> {
        lock(&self.calls).push(invocation.clone());

        let line = invocation.command_line();
        let response = {
            let mut responses = lock(&self.responses);
            responses
                .iter()
                .position(|(prefix, _)| line.starts_with(prefix.as_str()))
                .map(|index| responses.remove(index).1)
        };

        let (exit_code, stdout, stderr) = match response {
            Some(Response::MissingTool) => {
                return Err(Error::ToolNotFound {
                    tool: invocation.tool.program().to_string(),
                    hint: invocation.tool.install_hint().to_string(),
                });
            }
            Some(Response::Output {
                exit_code,
                stdout,
                stderr,
            }) => (exit_code, stdout, stderr),
            None => (0, String::new(), String::new()),
        };

        if invocation.check && exit_code != 0 {
            return Err(CommandFailure {
                command: invocation.tokens(),
                exit_code,
                stdout,
                stderr,
            }
            .into());
        }
        Ok(RunResult {
            command: invocation.tokens(),
            exit_code,
            stdout,
            stderr,
        })
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run.load(Ordering::Relaxed)
    }
}

/// Progress callback that keeps everything it is told
#[derive(Debug, Default)]
pub struct RecordingProgress {
    states: Mutex<Vec<MergeState>>,
    messages: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
}

impl RecordingProgress {
    /// States reported so far
    pub fn states(&self) -> Vec<MergeState> {
        lock(&self.states).clone()
    }

    /// Informational messages reported so far
    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }

    /// Warnings reported so far
    pub fn warnings(&self) -> Vec<String> {
        lock(&self.warnings).clone()
    }
}

impl ProgressCallback for RecordingProgress {
    fn on_state(&self, state: MergeState) {
        lock(&self.states).push(state);
    }

    fn on_message(&self, message: &str) {
        lock(&self.messages).push(message.to_string());
    }

    fn on_warning(&self, message: &str) {
        lock(&self.warnings).push(message.to_string());
    }
}

// A panicking test thread poisons the lock; the data is still usable.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
