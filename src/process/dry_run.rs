//! Dry-run wrapper: log mutating commands instead of running them

use super::{CommandRunner, Invocation};
use crate::error::Result;
use crate::types::RunResult;
use tracing::info;

/// Wraps a runner and suppresses every mutating invocation.
///
/// Suppressed commands are logged and answered with an empty, successful
/// [`RunResult`]. Read-only queries still reach the inner runner so lookups
/// behave as they would for real.
#[derive(Debug, Clone, Default)]
pub struct DryRunRunner<R> {
    inner: R,
}

impl<R: CommandRunner> DryRunRunner<R> {
    /// Wrap `inner`
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    /// The wrapped runner
    pub const fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: CommandRunner> CommandRunner for DryRunRunner<R> {
    fn run(&self, invocation: &Invocation) -> Result<RunResult> {
        if !invocation.mutating {
            return self.inner.run(invocation);
        }
        info!("[dry-run] {}", invocation.command_line());
        Ok(RunResult {
            command: invocation.tokens(),
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        })
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<String>>,
    }

    impl CommandRunner for Recorder {
        fn run(&self, invocation: &Invocation) -> Result<RunResult> {
            self.seen.borrow_mut().push(invocation.command_line());
            Err(Error::Domain("recorder always fails".into()))
        }
    }

    #[test]
    fn test_mutating_invocations_are_suppressed() {
        let runner = DryRunRunner::new(Recorder::default());
        let result = runner.run(&Invocation::git(["push", "origin", "main"])).unwrap();
        assert!(result.success());
        assert_eq!(result.command, vec!["git", "push", "origin", "main"]);
        assert!(runner.inner().seen.borrow().is_empty());
        assert!(runner.is_dry_run());
    }

    #[test]
    fn test_read_only_invocations_pass_through() {
        let runner = DryRunRunner::new(Recorder::default());
        let result = runner.run(&Invocation::gh(["pr", "view", "1"]).read_only());
        assert!(result.is_err());
        assert_eq!(*runner.inner().seen.borrow(), vec!["gh pr view 1"]);
    }
}
