//! Merge execution - effectful operations
//!
//! Runs a [`MergePlan`] against git and `gh`. Steps up to the push are
//! strictly ordered and any failure aborts with the error unchanged.

use crate::error::Result;
use crate::fallback::{Attempt, any_command_failure, with_fallback};
use crate::merge::plan::{Cleanup, MergePlan, MergeState};
use crate::platform::GitHubCli;
use crate::progress::ProgressCallback;
use crate::vcs::Git;
use tracing::{debug, warn};

/// Result of merge execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeExecutionResult {
    /// State the merge ended in
    pub state: MergeState,
    /// Whether the delete had to go through git after `gh pr close` failed
    pub used_fallback: bool,
}

impl MergeExecutionResult {
    /// Whether the remote head branch was removed
    pub const fn branch_removed(&self) -> bool {
        matches!(self.state, MergeState::ClosedViaPr | MergeState::BranchDeleted)
    }
}

fn advance(progress: &dyn ProgressCallback, state: MergeState) -> MergeState {
    debug!(%state, "merge state");
    progress.on_state(state);
    state
}

/// Execute the merge plan (EFFECTFUL)
///
/// Checks out and pulls base, merges head without committing, commits with
/// the backdated environment, pushes base, then applies the cleanup.
pub fn execute_merge(
    plan: &MergePlan,
    git: &Git<'_>,
    github: &GitHubCli<'_>,
    progress: &dyn ProgressCallback,
) -> Result<MergeExecutionResult> {
    progress.on_message(&format!("Syncing {} from {}", plan.base, plan.remote));
    git.checkout(&plan.base)?;
    git.pull(&plan.remote, &plan.base)?;
    advance(progress, MergeState::BaseSynced);

    progress.on_message(&format!("Merging {} into {}", plan.head, plan.base));
    git.merge_no_commit(&plan.base, &plan.head)?;
    advance(progress, MergeState::MergePending);

    git.finalize_merge_commit(&plan.message, &plan.env)?;
    advance(progress, MergeState::MergeCommitted);

    git.push(&plan.remote, &plan.base, false)?;
    advance(progress, MergeState::Pushed);

    let (state, used_fallback) = match plan.cleanup {
        Cleanup::LeaveBranch => (MergeState::Done, false),
        Cleanup::DeleteBranch => {
            git.delete_remote_branch(&plan.remote, &plan.head)?;
            (MergeState::BranchDeleted, false)
        }
        Cleanup::ClosePullRequest { number } => close_or_delete(plan, number, git, github, progress)?,
    };

    Ok(MergeExecutionResult {
        state: advance(progress, state),
        used_fallback,
    })
}

fn close_or_delete(
    plan: &MergePlan,
    number: u64,
    git: &Git<'_>,
    github: &GitHubCli<'_>,
    progress: &dyn ProgressCallback,
) -> Result<(MergeState, bool)> {
    let finished = match github.pull_request(number) {
        Ok(pr) => pr.is_finished(),
        // Unknown state is handled like an open PR. `gh pr close` records the
        // PR as closed instead of leaving it open against a deleted branch, and
        // a failed close still ends in the git delete below.
        Err(e) => {
            warn!(number, error = %e.summary(), "could not re-check pull request state");
            false
        }
    };

    if finished {
        debug!(number, "pull request already closed, deleting branch directly");
        git.delete_remote_branch(&plan.remote, &plan.head)?;
        return Ok((MergeState::BranchDeleted, false));
    }

    let attempt = with_fallback(
        || github.close_pull_request(number, true),
        any_command_failure,
        || {
            progress.on_warning(&format!(
                "closing PR #{number} failed, deleting {} with git",
                plan.head
            ));
            git.delete_remote_branch(&plan.remote, &plan.head)
        },
    )?;
    Ok(match attempt {
        Attempt::Primary(_) => (MergeState::ClosedViaPr, false),
        Attempt::Fallback(_) => (MergeState::BranchDeleted, true),
    })
}
