//! Hosting operations
//!
//! Repository and pull request operations through the GitHub CLI. Output is
//! requested as JSON where `gh` offers it and parsed with `serde_json`.

mod github;

pub use github::GitHubCli;

use crate::types::Visibility;
use std::path::PathBuf;

/// Parameters for `gh repo create`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCreate {
    /// Repository name, without owner
    pub name: String,
    /// Local working tree to push
    pub source_dir: PathBuf,
    /// Public or private
    pub visibility: Visibility,
    /// Remote name to register locally
    pub remote: String,
    /// Optional repository description
    pub description: Option<String>,
    /// User or organization to create the repository under
    pub owner: Option<String>,
}

impl RepoCreate {
    /// `owner/name`, or just `name` without an owner
    pub fn full_name(&self) -> String {
        match self.owner.as_deref().filter(|o| !o.is_empty()) {
            Some(owner) => format!("{owner}/{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Parameters for `gh pr create`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrCreate {
    /// Head branch
    pub head: String,
    /// Base branch
    pub base: String,
    /// PR title
    pub title: String,
    /// PR body (may be empty)
    pub body: String,
    /// Open as a draft
    pub draft: bool,
}
