//! Shared test helpers

#![allow(dead_code)]

pub use backdate::process::testing::{RecordingProgress, ScriptedRunner};

use backdate::backdate::CommitIdentity;
use backdate::merge::MergeRequest;

/// Author and committer used across tests
pub fn ada() -> CommitIdentity {
    CommitIdentity {
        committer_name: Some("ada-gh".into()),
        ..CommitIdentity::author("Ada Lovelace", "ada@example.com")
    }
}

/// Merge of `feature-x` into `main` via PR #42, deleting the branch
pub fn merge_request() -> MergeRequest {
    MergeRequest {
        base: "main".into(),
        head: "feature-x".into(),
        remote: "origin".into(),
        pr_number: Some(42),
        date: "2024-06-01 10:00:00".into(),
        message: None,
        delete_branch: true,
    }
}
