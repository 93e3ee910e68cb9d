//! Backdating primitives
//!
//! Pure functions only: turning user dates into git dates, and dates plus
//! identity into the environment git reads when creating a commit.

pub mod date;
mod env;

pub use date::{normalize, normalize_with_offset};
pub use env::{
    CommitEnvironment, CommitIdentity, GIT_AUTHOR_DATE, GIT_AUTHOR_EMAIL, GIT_AUTHOR_NAME,
    GIT_COMMITTER_DATE, GIT_COMMITTER_EMAIL, GIT_COMMITTER_NAME,
};
