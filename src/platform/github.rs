//! GitHub through the `gh` CLI

use super::{PrCreate, RepoCreate};
use crate::error::{Error, Result};
use crate::process::{CommandRunner, Invocation};
use crate::types::{Lookup, PrState, PullRequest, RunResult};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::debug;

#[derive(Deserialize)]
struct PrNumber {
    number: u64,
}

/// GitHub hosting operations via `gh`
pub struct GitHubCli<'a> {
    runner: &'a dyn CommandRunner,
    cwd: Option<PathBuf>,
    token: Option<String>,
}

impl<'a> GitHubCli<'a> {
    /// Run `gh` in `cwd` (or the current directory)
    pub const fn new(runner: &'a dyn CommandRunner, cwd: Option<PathBuf>) -> Self {
        Self {
            runner,
            cwd,
            token: None,
        }
    }

    /// Pass `token` to every call as `GH_TOKEN`
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    fn gh<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let inv = Invocation::gh(args).current_dir(self.cwd.clone());
        match &self.token {
            Some(token) => inv.env("GH_TOKEN", token.as_str()),
            None => inv,
        }
    }

    /// Create the remote repository and push `source_dir` to it
    pub fn create_repository(&self, spec: &RepoCreate) -> Result<RunResult> {
        let mut args = vec![
            "repo".to_string(),
            "create".to_string(),
            spec.full_name(),
            spec.visibility.flag().to_string(),
            "--source".to_string(),
            spec.source_dir.display().to_string(),
            "--remote".to_string(),
            spec.remote.clone(),
            "--push".to_string(),
        ];
        if let Some(description) = spec.description.as_deref().filter(|d| !d.is_empty()) {
            args.extend(["--description".to_string(), description.to_string()]);
        }
        let inv = self.gh(args).current_dir(Some(spec.source_dir.clone()));
        self.runner.run(&inv)
    }

    /// `gh pr create`, returning its output (the PR URL on stdout)
    pub fn open_pull_request(&self, pr: &PrCreate) -> Result<RunResult> {
        let mut args = vec![
            "pr",
            "create",
            "--head",
            pr.head.as_str(),
            "--base",
            pr.base.as_str(),
            "--title",
            pr.title.as_str(),
            "--body",
            pr.body.as_str(),
        ];
        if pr.draft {
            args.push("--draft");
        }
        self.runner.run(&self.gh(args))
    }

    /// Create a PR and return its number
    pub fn create_pull_request(&self, pr: &PrCreate) -> Result<u64> {
        self.open_pull_request(pr)?;
        let result = self.runner.run(&self.list_open_for(&pr.head))?;
        first_number(&result.stdout).ok_or_else(|| {
            Error::Domain(format!(
                "pull request for '{}' was created but its number could not be resolved",
                pr.head
            ))
        })
    }

    fn list_open_for(&self, head: &str) -> Invocation {
        self.gh(["pr", "list", "--state", "open", "--head", head, "--json", "number"])
            .read_only()
    }

    /// Number of the first open PR whose head is `head`
    pub fn lookup_pr_number_for_branch(&self, head: &str) -> Lookup<u64> {
        let result = match self.runner.run(&self.list_open_for(head).allow_failure()) {
            Ok(result) => result,
            Err(e) => return Lookup::Unavailable(e.summary()),
        };
        if !result.success() {
            return Lookup::Unavailable(result.stderr.trim().to_string());
        }
        first_number(&result.stdout).map_or(Lookup::NotFound, Lookup::Found)
    }

    /// Selected JSON fields of a PR; empty when the output does not parse
    pub fn view_pull_request(&self, number: u64, fields: &[&str]) -> Result<Map<String, Value>> {
        let inv = self
            .gh([
                "pr".to_string(),
                "view".to_string(),
                number.to_string(),
                "--json".to_string(),
                fields.join(","),
            ])
            .read_only();
        let result = self.runner.run(&inv)?;
        Ok(serde_json::from_str(result.stdout_trimmed()).unwrap_or_else(|e| {
            debug!(number, error = %e, "unparseable pr view output");
            Map::new()
        }))
    }

    /// Head branch, URL and state of a PR
    pub fn pull_request(&self, number: u64) -> Result<PullRequest> {
        let fields = self.view_pull_request(number, &["headRefName", "url", "state"])?;
        let text = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Ok(PullRequest {
            number,
            head_ref: text("headRefName"),
            url: text("url"),
            state: text("state").and_then(|s| s.parse::<PrState>().ok()),
        })
    }

    /// `gh pr close <n> [--delete-branch]`
    pub fn close_pull_request(&self, number: u64, delete_branch: bool) -> Result<RunResult> {
        let mut args = vec!["pr".to_string(), "close".to_string(), number.to_string()];
        if delete_branch {
            args.push("--delete-branch".to_string());
        }
        self.runner.run(&self.gh(args))
    }

    /// `gh pr comment <n> --body <body>`
    pub fn comment_on_pull_request(&self, number: u64, body: &str) -> Result<RunResult> {
        let number = number.to_string();
        self.runner
            .run(&self.gh(["pr", "comment", number.as_str(), "--body", body]))
    }

    /// `gh pr review <n> [--approve] [--body <body>]`
    pub fn review_pull_request(&self, number: u64, body: &str, approve: bool) -> Result<RunResult> {
        let number = number.to_string();
        let mut args = vec!["pr", "review", number.as_str()];
        if approve {
            args.push("--approve");
        } else {
            args.push("--comment");
        }
        if !body.is_empty() {
            args.extend(["--body", body]);
        }
        self.runner.run(&self.gh(args))
    }
}

fn first_number(stdout: &str) -> Option<u64> {
    serde_json::from_str::<Vec<PrNumber>>(stdout.trim())
        .ok()?
        .first()
        .map(|pr| pr.number)
}
