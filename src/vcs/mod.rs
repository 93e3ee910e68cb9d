//! Git operations
//!
//! Thin, named wrappers over `git` subcommands. Each method builds one or two
//! [`Invocation`]s and hands them to the runner; nothing here reads
//! repository history itself.

use crate::backdate::CommitEnvironment;
use crate::error::{Error, Result};
use crate::process::{CommandRunner, Invocation};
use crate::types::RunResult;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Commit counts between two refs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AheadBehind {
    /// Commits on head that base does not have
    pub ahead: u64,
    /// Commits on base that head does not have
    pub behind: u64,
}

/// A git working tree driven through a [`CommandRunner`]
pub struct Git<'a> {
    runner: &'a dyn CommandRunner,
    dir: PathBuf,
}

impl<'a> Git<'a> {
    /// Operate on the working tree at `dir`
    pub fn new(runner: &'a dyn CommandRunner, dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            dir: dir.into(),
        }
    }

    /// Working tree directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn git<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::git(args).current_dir(Some(self.dir.clone()))
    }

    fn run(&self, invocation: &Invocation) -> Result<RunResult> {
        self.runner.run(invocation)
    }

    /// `git init --initial-branch=<base>`
    pub fn init(&self, base: &str) -> Result<RunResult> {
        self.run(&self.git(["init".to_string(), format!("--initial-branch={base}")]))
    }

    /// `git add <pathspecs...>`
    pub fn stage(&self, pathspecs: &[&str]) -> Result<RunResult> {
        let args = std::iter::once("add").chain(pathspecs.iter().copied());
        self.run(&self.git(args))
    }

    /// Commit staged changes with the given environment overlay
    pub fn commit(
        &self,
        message: &str,
        env: &CommitEnvironment,
        allow_empty: bool,
    ) -> Result<RunResult> {
        let mut args = vec!["commit"];
        if allow_empty {
            args.push("--allow-empty");
        }
        args.extend(["-m", message]);
        self.run(&self.git(args).commit_env(env))
    }

    /// `git checkout <reference>`
    pub fn checkout(&self, reference: &str) -> Result<RunResult> {
        self.run(&self.git(["checkout", reference]))
    }

    /// Whether `reference` resolves locally
    pub fn branch_exists(&self, reference: &str) -> Result<bool> {
        let inv = self
            .git(["rev-parse", "--verify", "--quiet", reference])
            .read_only()
            .allow_failure();
        Ok(self.run(&inv)?.success())
    }

    /// The remote-tracking branch `branch` pushes to. Fails with git's
    /// "no upstream configured" error when there is none.
    pub fn upstream(&self, branch: &str) -> Result<RunResult> {
        let tracking = format!("{branch}@{{upstream}}");
        let inv = self
            .git(["rev-parse", "--abbrev-ref", tracking.as_str()])
            .read_only();
        self.run(&inv)
    }

    /// Create `name` from `base`, fetching `base` from `remote` if it is not
    /// known locally
    pub fn create_branch(&self, name: &str, base: &str, remote: &str) -> Result<()> {
        if !self.branch_exists(base)? {
            debug!(base, remote, "base branch missing locally, fetching");
            self.fetch(remote, &format!("{base}:{base}"))?;
        }
        self.checkout(base)?;
        self.run(&self.git(["checkout", "-b", name]))?;
        Ok(())
    }

    /// Check out `base` and merge `head` into it without committing
    pub fn merge_no_commit(&self, base: &str, head: &str) -> Result<RunResult> {
        self.checkout(base)?;
        self.merge_no_ff_no_commit(head)
    }

    /// Merge `head` into the current branch, always producing a merge, and
    /// stop before the commit
    pub fn merge_no_ff_no_commit(&self, head: &str) -> Result<RunResult> {
        self.run(&self.git(["merge", "--no-ff", "--no-commit", head]))
    }

    /// Whether a merge is waiting to be committed
    pub fn merge_in_progress(&self) -> Result<bool> {
        let inv = self
            .git(["rev-parse", "-q", "--verify", "MERGE_HEAD"])
            .read_only()
            .allow_failure();
        Ok(self.run(&inv)?.success())
    }

    /// Commit the pending merge with the backdated environment.
    ///
    /// Refuses to run when no merge is in progress, so a second call cannot
    /// produce an unrelated commit. Under dry-run the check is skipped since
    /// the merge itself was never performed.
    pub fn finalize_merge_commit(
        &self,
        message: &str,
        env: &CommitEnvironment,
    ) -> Result<RunResult> {
        if !self.runner.is_dry_run() && !self.merge_in_progress()? {
            return Err(Error::Domain("no merge in progress".into()));
        }
        self.run(&self.git(["commit", "-m", message]).commit_env(env))
    }

    /// `git push [-u] <remote> <refspec>`
    pub fn push(&self, remote: &str, refspec: &str, set_upstream: bool) -> Result<RunResult> {
        let mut args = vec!["push"];
        if set_upstream {
            args.push("-u");
        }
        args.extend([remote, refspec]);
        self.run(&self.git(args))
    }

    /// `git push <remote> --delete <branch>`
    pub fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<RunResult> {
        self.run(&self.git(["push", remote, "--delete", branch]))
    }

    /// `git pull <remote> <reference>`
    pub fn pull(&self, remote: &str, reference: &str) -> Result<RunResult> {
        self.run(&self.git(["pull", remote, reference]))
    }

    /// `git fetch <remote> <refspec>`
    pub fn fetch(&self, remote: &str, refspec: &str) -> Result<RunResult> {
        self.run(&self.git(["fetch", remote, refspec]))
    }

    /// Commits `head` has over `base`, and the reverse
    pub fn ahead_behind(&self, base: &str, head: &str) -> Result<AheadBehind> {
        let range = format!("{base}...{head}");
        let inv = self
            .git(["rev-list", "--left-right", "--count", range.as_str()])
            .read_only();
        let result = self.run(&inv)?;
        parse_left_right(result.stdout_trimmed())
            .ok_or_else(|| Error::Domain(format!("unexpected rev-list output: {:?}", result.stdout)))
    }
}

fn parse_left_right(text: &str) -> Option<AheadBehind> {
    let mut counts = text.split_whitespace().map(str::parse::<u64>);
    let behind = counts.next()?.ok()?;
    let ahead = counts.next()?.ok()?;
    Some(AheadBehind { ahead, behind })
}
