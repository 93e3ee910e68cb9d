//! CLI command implementations

pub mod commit;
pub mod commit_all;
pub mod context;
pub mod create_branch;
pub mod create_repo;
pub mod merge_pr;
pub mod open_pr;
pub mod style;

use anstream::println;
use backdate::merge::{MergeExecutionResult, MergeState};
use backdate::progress::ProgressCallback;
use clap::Args;
use style::{Stylize, check};

/// `--delete-branch` / `--no-delete-branch`
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct DeleteBranchArgs {
    /// Delete the remote branch after merging (default)
    #[arg(long, overrides_with = "no_delete_branch")]
    pub delete_branch: bool,

    /// Keep the remote branch after merging
    #[arg(long, overrides_with = "delete_branch")]
    pub no_delete_branch: bool,
}

impl DeleteBranchArgs {
    /// Whether the branch should be deleted
    pub const fn enabled(self) -> bool {
        !self.no_delete_branch
    }
}

/// Progress printer for the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct CliProgress {
    show_states: bool,
}

impl CliProgress {
    /// Print every merge state transition as well as messages
    pub const fn detailed() -> Self {
        Self { show_states: true }
    }
}

impl ProgressCallback for CliProgress {
    fn on_state(&self, state: MergeState) {
        if self.show_states {
            println!("  {} {}", check(), state.muted());
        }
    }

    fn on_message(&self, message: &str) {
        println!("{message}");
    }

    fn on_warning(&self, message: &str) {
        println!("{}", format!("⚠️  {message}").warn());
    }
}

/// Print the outcome of a merge
pub fn print_merge_summary(base: &str, head: &str, result: &MergeExecutionResult) {
    println!(
        "{} Merged {} into {}",
        check(),
        head.accent(),
        base.accent()
    );
    match result.state {
        MergeState::ClosedViaPr => println!("   {}", "Pull request closed, branch deleted".muted()),
        MergeState::BranchDeleted if result.used_fallback => {
            println!("   {}", "Branch deleted with git (closing the PR failed)".muted());
        }
        MergeState::BranchDeleted => println!("   {}", "Remote branch deleted".muted()),
        _ => println!("   {}", format!("Branch {head} left in place").muted()),
    }
}
