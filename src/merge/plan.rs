//! Merge planning - pure functions for creating merge plans
//!
//! Everything that can be decided without touching git or `gh` is decided
//! here: the commit message, the backdated environment and the cleanup
//! strategy. A bad date therefore fails before any command runs.

use crate::backdate::{CommitEnvironment, CommitIdentity};
use crate::error::Result;

/// Where a merge has got to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    /// Nothing has run yet
    NotStarted,
    /// Base is checked out and up to date with the remote
    BaseSynced,
    /// Head is merged into the index, commit pending
    MergePending,
    /// The backdated merge commit exists locally
    MergeCommitted,
    /// Base was pushed
    Pushed,
    /// The PR was closed and its branch deleted by `gh`
    ClosedViaPr,
    /// The head branch was deleted on the remote with `git push --delete`
    BranchDeleted,
    /// Finished, head branch left in place
    Done,
}

impl MergeState {
    /// Whether no further step follows
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::ClosedViaPr | Self::BranchDeleted | Self::Done)
    }
}

impl std::fmt::Display for MergeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::NotStarted => "not started",
            Self::BaseSynced => "base synced",
            Self::MergePending => "merge pending",
            Self::MergeCommitted => "merge committed",
            Self::Pushed => "pushed",
            Self::ClosedViaPr => "closed via pull request",
            Self::BranchDeleted => "branch deleted",
            Self::Done => "done",
        };
        f.write_str(text)
    }
}

/// What to do with the head branch once base is pushed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleanup {
    /// Re-check the PR, then close it with `--delete-branch` (or delete the
    /// branch directly if the PR is already closed)
    ClosePullRequest {
        /// PR number
        number: u64,
    },
    /// Delete the remote head branch with git
    DeleteBranch,
    /// Leave the head branch alone
    LeaveBranch,
}

/// Caller input for a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Branch to merge into
    pub base: String,
    /// Branch being merged
    pub head: String,
    /// Remote to sync with and push to
    pub remote: String,
    /// PR being merged, when there is one
    pub pr_number: Option<u64>,
    /// Date for the merge commit
    pub date: String,
    /// Message override
    pub message: Option<String>,
    /// Remove the head branch from the remote afterwards
    pub delete_branch: bool,
}

/// Merge plan - the functional core output
///
/// Created by [`create_merge_plan`] (pure) and executed by
/// [`execute_merge`](super::execute_merge) (effectful).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Branch to merge into
    pub base: String,
    /// Branch being merged
    pub head: String,
    /// Remote to sync with and push to
    pub remote: String,
    /// Merge commit message
    pub message: String,
    /// Backdated commit environment
    pub env: CommitEnvironment,
    /// Head branch handling after the push
    pub cleanup: Cleanup,
}

/// Default merge commit message, matching what GitHub writes
pub fn render_merge_message(pr_number: Option<u64>, head: &str, base: &str) -> String {
    match pr_number {
        Some(number) => format!("Merge pull request #{number} from {head}"),
        None => format!("Merge branch '{head}' into {base}"),
    }
}

/// Create a merge plan (PURE - no I/O, easily testable)
pub fn create_merge_plan(request: &MergeRequest, identity: &CommitIdentity) -> Result<MergePlan> {
    let env = CommitEnvironment::build(Some(&request.date), identity)?;
    let message = request
        .message
        .clone()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| render_merge_message(request.pr_number, &request.head, &request.base));
    let cleanup = match (request.delete_branch, request.pr_number) {
        (false, _) => Cleanup::LeaveBranch,
        (true, Some(number)) => Cleanup::ClosePullRequest { number },
        (true, None) => Cleanup::DeleteBranch,
    };

    Ok(MergePlan {
        base: request.base.clone(),
        head: request.head.clone(),
        remote: request.remote.clone(),
        message,
        env,
        cleanup,
    })
}
