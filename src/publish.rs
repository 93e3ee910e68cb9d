//! Publishing a branch to the remote

use crate::error::{Error, Result};
use crate::fallback::{Attempt, with_fallback};
use crate::types::RunResult;
use crate::vcs::Git;

/// Push `branch` to `remote`.
///
/// A branch that already tracks a remote branch is pushed plainly. One without
/// an upstream makes the tracking lookup fail, and is pushed with `-u` instead
/// so later pushes and pulls know where to go.
pub fn push_branch(git: &Git<'_>, remote: &str, branch: &str) -> Result<Attempt<RunResult>> {
    with_fallback(
        || {
            git.upstream(branch)?;
            git.push(remote, branch, false)
        },
        is_missing_upstream,
        || git.push(remote, branch, true),
    )
}

/// Whether a push failed because the branch has no upstream
pub fn is_missing_upstream(error: &Error) -> bool {
    error.command_failure().is_some_and(|failure| {
        let stderr = failure.stderr.to_ascii_lowercase();
        stderr.contains("no upstream") || stderr.contains("set-upstream")
    })
}
