//! External process execution
//!
//! Every call to `git` or `gh` is described by an [`Invocation`] and executed
//! by a [`CommandRunner`]. The trait is the seam that lets tests record and
//! script calls, and lets dry-run mode suppress anything that mutates state.

mod dry_run;
mod system;
pub mod testing;

pub use dry_run::DryRunRunner;
pub use system::{InterruptFlag, SystemRunner};

use crate::backdate::CommitEnvironment;
use crate::error::Result;
use crate::types::RunResult;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// External tools backdate drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// The version-control tool
    Git,
    /// The GitHub CLI
    Gh,
}

impl Tool {
    /// Executable name looked up on `PATH`
    pub const fn program(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Gh => "gh",
        }
    }

    /// Where to get the tool when it is missing
    pub const fn install_hint(self) -> &'static str {
        match self {
            Self::Git => "See https://git-scm.com/downloads",
            Self::Gh => "See https://cli.github.com/",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.program())
    }
}

/// One external command, before it runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Which executable to run
    pub tool: Tool,
    /// Arguments after the program name
    pub args: Vec<String>,
    /// Working directory (inherits ours when `None`)
    pub cwd: Option<PathBuf>,
    /// Variables layered on top of the ambient environment
    pub env: BTreeMap<String, String>,
    /// Turn a non-zero exit into an error
    pub check: bool,
    /// Whether the command changes local or remote state
    pub mutating: bool,
}

impl Invocation {
    /// A checked, mutating invocation of `tool`
    pub fn new<I, S>(tool: Tool, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tool,
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            env: BTreeMap::new(),
            check: true,
            mutating: true,
        }
    }

    /// `git <args>`
    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Tool::Git, args)
    }

    /// `gh <args>`
    pub fn gh<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Tool::Gh, args)
    }

    /// Run in `dir` instead of the current directory
    #[must_use]
    pub fn current_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.cwd = dir;
        self
    }

    /// Add one environment variable
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Add every variable of a commit environment
    #[must_use]
    pub fn commit_env(mut self, env: &CommitEnvironment) -> Self {
        for (key, value) in env.iter() {
            self.env.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Mark as a query that never changes state (still runs in dry-run mode)
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.mutating = false;
        self
    }

    /// Return the result even when the process exits non-zero
    #[must_use]
    pub const fn allow_failure(mut self) -> Self {
        self.check = false;
        self
    }

    /// Program followed by arguments
    pub fn tokens(&self) -> Vec<String> {
        std::iter::once(self.tool.program().to_string())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Human-readable command line, quoted so it can be pasted into a shell
    pub fn command_line(&self) -> String {
        self.tokens()
            .iter()
            .map(|token| shell_quote(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn shell_quote(token: &str) -> String {
    let plain = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@+,#%^".contains(c));
    if plain {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}

/// Executes invocations
pub trait CommandRunner {
    /// Run the invocation to completion and capture its output.
    ///
    /// Fails with `ToolNotFound` when the executable is missing, and with
    /// `Command` when it exits non-zero and `invocation.check` is set.
    fn run(&self, invocation: &Invocation) -> Result<RunResult>;

    /// Whether mutating invocations are being suppressed
    fn is_dry_run(&self) -> bool {
        false
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<RunResult> {
        (**self).run(invocation)
    }

    fn is_dry_run(&self) -> bool {
        (**self).is_dry_run()
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<R> {
    fn run(&self, invocation: &Invocation) -> Result<RunResult> {
        (**self).run(invocation)
    }

    fn is_dry_run(&self) -> bool {
        (**self).is_dry_run()
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, invocation: &Invocation) -> Result<RunResult> {
        (**self).run(invocation)
    }

    fn is_dry_run(&self) -> bool {
        (**self).is_dry_run()
    }
}
