//! Backdated merge of a branch or pull request
//!
//! Two-phase pattern:
//! 1. Plan - render message, build environment, pick cleanup (pure, testable)
//! 2. Execute - sync, merge, commit, push, clean up (effectful)

mod execute;
mod plan;

pub use execute::{MergeExecutionResult, execute_merge};
pub use plan::{
    Cleanup, MergePlan, MergeRequest, MergeState, create_merge_plan, render_merge_message,
};
