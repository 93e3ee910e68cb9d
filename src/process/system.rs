//! Runner that spawns real child processes

use super::{CommandRunner, Invocation};
use crate::error::{CommandFailure, Error, Result};
use crate::types::RunResult;
use std::io::ErrorKind;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Set when the user presses Ctrl-C.
///
/// The child receives the signal too; the runner checks the flag once the
/// child has exited and reports [`Error::Interrupted`] instead of whatever
/// the child printed on its way out.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    /// Install a Ctrl-C handler that sets a new flag
    pub fn install() -> Result<Self> {
        let flag = Self::default();
        let handle = flag.clone();
        ctrlc::set_handler(move || handle.trigger()).map_err(std::io::Error::other)?;
        Ok(flag)
    }

    /// Mark the run as interrupted
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether Ctrl-C was pressed
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs invocations as blocking child processes with captured output
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    interrupt: InterruptFlag,
}

impl SystemRunner {
    /// Runner that reports interruption through `interrupt`
    pub const fn new(interrupt: InterruptFlag) -> Self {
        Self { interrupt }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunResult> {
        if self.interrupt.is_set() {
            return Err(Error::Interrupted);
        }
        if let Some(dir) = &invocation.cwd
            && !dir.is_dir()
        {
            return Err(Error::Domain(format!(
                "working directory does not exist: {}",
                dir.display()
            )));
        }

        let mut command = Command::new(invocation.tool.program());
        command
            .args(&invocation.args)
            .envs(&invocation.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &invocation.cwd {
            command.current_dir(dir);
        }

        debug!(command = %invocation.command_line(), "running");
        let output = command.output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::ToolNotFound {
                    tool: invocation.tool.program().to_string(),
                    hint: invocation.tool.install_hint().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        if self.interrupt.is_set() {
            return Err(Error::Interrupted);
        }

        let result = RunResult {
            command: invocation.tokens(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(exit_code = result.exit_code, "finished");

        if invocation.check && !result.success() {
            return Err(CommandFailure {
                command: result.command,
                exit_code: result.exit_code,
                stdout: result.stdout,
                stderr: result.stderr,
            }
            .into());
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Tool;
    use tempfile::TempDir;

    #[test]
    fn test_missing_working_directory_is_domain_error() {
        let temp = TempDir::new().unwrap();
        let inv = Invocation::git(["status"]).current_dir(Some(temp.path().join("nope")));
        let result = SystemRunner::default().run(&inv);
        assert!(matches!(result, Err(Error::Domain(msg)) if msg.contains("does not exist")));
    }

    #[test]
    fn test_interrupted_runner_refuses_to_spawn() {
        let flag = InterruptFlag::default();
        flag.trigger();
        let result = SystemRunner::new(flag).run(&Invocation::new(Tool::Git, ["--version"]));
        assert!(matches!(result, Err(Error::Interrupted)));
    }
}
