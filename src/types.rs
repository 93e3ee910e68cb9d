//! Core types for backdate

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Outcome of one external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Program and arguments, in order
    pub command: Vec<String>,
    /// Exit code (-1 when the child was killed by a signal)
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl RunResult {
    /// Whether the process exited with status 0
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Standard output with surrounding whitespace removed
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }
}

/// The account that authored and committed backdated history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Display name (falls back to the login)
    pub name: String,
    /// Verified primary email, or a noreply address
    pub email: String,
    /// Hosting account handle
    pub login: String,
}

/// Result of a best-effort query
///
/// Distinguishes "the thing does not exist" from "we could not ask", so call
/// sites can decide whether to fall back to other sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The value was found
    Found(T),
    /// The query ran but matched nothing
    NotFound,
    /// The query itself failed (tool missing, not authenticated, offline)
    Unavailable(String),
}

impl<T> Lookup<T> {
    /// Convert to an `Option`, discarding why a value is absent
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound | Self::Unavailable(_) => None,
        }
    }

    /// Whether a value was found
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Pull request state as reported by `gh pr view --json state`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrState {
    /// Open and mergeable in principle
    Open,
    /// Closed without merging
    Closed,
    /// Merged on the hosting side
    Merged,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

impl FromStr for PrState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "CLOSED" => Ok(Self::Closed),
            "MERGED" => Ok(Self::Merged),
            other => Err(Error::Domain(format!("unknown pull request state: {other:?}"))),
        }
    }
}

/// A pull request, as looked up on demand
///
/// Fields are optional because `gh pr view` output is parsed defensively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Head branch name
    pub head_ref: Option<String>,
    /// Web URL
    pub url: Option<String>,
    /// Current state
    pub state: Option<PrState>,
}

impl PullRequest {
    /// Whether the PR is known to be closed or merged already
    pub fn is_finished(&self) -> bool {
        matches!(self.state, Some(PrState::Closed | PrState::Merged))
    }
}

/// Repository visibility for `gh repo create`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Only visible to the owner and collaborators
    #[default]
    Private,
    /// Visible to everyone
    Public,
}

impl Visibility {
    /// The `gh repo create` flag for this visibility
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Private => "--private",
            Self::Public => "--public",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Private => write!(f, "private"),
            Self::Public => write!(f, "public"),
        }
    }
}

impl FromStr for Visibility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "private" => Ok(Self::Private),
            "public" => Ok(Self::Public),
            _ => Err(Error::Config(format!(
                "visibility must be 'private' or 'public', got {s:?}"
            ))),
        }
    }
}
