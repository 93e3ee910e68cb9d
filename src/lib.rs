//! backdate - backdated git history and GitHub pull requests
//!
//! Drives `git` and the GitHub CLI to create repositories, branches, commits,
//! pull requests and merge commits whose timestamps are chosen by the caller.
//!
//! # Architecture
//!
//! - [`backdate`]: date normalization and the per-commit `GIT_*` environment
//! - [`process`]: the [`process::CommandRunner`] seam, real and dry-run runners
//! - [`vcs`]: named `git` operations
//! - [`platform`]: `gh` repository and pull request operations
//! - [`identity`]: fill in author/committer from the `gh` account
//! - [`merge`]: plan and execute a backdated merge
//! - [`config`]: layered TOML/env/CLI configuration

pub mod backdate;
pub mod config;
pub mod error;
pub mod fallback;
pub mod identity;
pub mod merge;
pub mod platform;
pub mod process;
pub mod progress;
pub mod publish;
pub mod types;
pub mod vcs;

pub use error::{Error, Result};
