//! commit-all: commit, push, open a PR and merge it, in one go

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use crate::cli::{CliProgress, DeleteBranchArgs, print_merge_summary};
use anstream::println;
use backdate::backdate::normalize;
use backdate::error::Result;
use backdate::merge::{MergeRequest, create_merge_plan, execute_merge};
use backdate::platform::PrCreate;
use backdate::progress::ProgressCallback;
use backdate::publish::push_branch;
use backdate::types::Lookup;
use clap::Args;
use std::fs;

/// File rewritten on every `commit-all` so the commit is never empty
pub const MARKER_FILE: &str = ".backdate-activity";

/// Arguments for `commit-all`
#[derive(Debug, Args)]
pub struct CommitAllArgs {
    /// Feature branch (created from base if missing)
    #[arg(long)]
    pub branch: String,

    /// Base branch (defaults to the configured base branch)
    #[arg(long)]
    pub base: Option<String>,

    /// Date of the feature commit
    #[arg(long)]
    pub commit_date: String,

    /// Commit message
    #[arg(long)]
    pub message: String,

    /// PR title (defaults to the commit message)
    #[arg(long)]
    pub pr_title: Option<String>,

    /// PR body
    #[arg(long)]
    pub pr_body: Option<String>,

    /// Date of the merge commit
    #[arg(long)]
    pub merge_date: String,

    #[command(flatten)]
    pub delete: DeleteBranchArgs,
}

/// Run `commit-all`
pub fn run(ctx: &CommandContext, args: &CommitAllArgs) -> Result<()> {
    normalize(&args.commit_date)?;
    normalize(&args.merge_date)?;
    let base = ctx.base();
    let git = ctx.git();
    let progress = CliProgress::detailed();

    if git.branch_exists(&args.branch)? {
        git.checkout(&args.branch)?;
    } else {
        git.create_branch(&args.branch, base, ctx.remote())?;
    }

    if !ctx.dry_run() {
        fs::write(
            ctx.repo_dir.join(MARKER_FILE),
            format!("{} :: {}\n", args.commit_date, args.message),
        )?;
    }
    git.stage(&[MARKER_FILE])?;
    git.commit(&args.message, &ctx.commit_env(Some(&args.commit_date))?, false)?;
    push_branch(&git, ctx.remote(), &args.branch)?;
    println!("{} Committed and pushed {}", check(), args.branch.accent());

    let github = ctx.github();
    let pr = PrCreate {
        head: args.branch.clone(),
        base: base.to_string(),
        title: args.pr_title.clone().unwrap_or_else(|| args.message.clone()),
        body: args.pr_body.clone().unwrap_or_default(),
        draft: false,
    };
    let opened = github.open_pull_request(&pr)?;
    let pr_number = if ctx.dry_run() {
        None
    } else {
        match github.lookup_pr_number_for_branch(&args.branch) {
            Lookup::Found(number) => Some(number),
            Lookup::NotFound | Lookup::Unavailable(_) => {
                progress.on_warning("pull request number not found; merging as a plain branch");
                None
            }
        }
    };
    let url = opened.stdout_trimmed();
    if !url.is_empty() {
        println!("{} Opened {}", check(), url.muted());
    }

    let request = MergeRequest {
        base: base.to_string(),
        head: args.branch.clone(),
        remote: ctx.remote().to_string(),
        pr_number,
        date: args.merge_date.clone(),
        message: None,
        delete_branch: args.delete.enabled(),
    };
    let plan = create_merge_plan(&request, ctx.identity())?;
    let result = execute_merge(&plan, &git, &github, &progress)?;
    print_merge_summary(&plan.base, &plan.head, &result);
    Ok(())
}
