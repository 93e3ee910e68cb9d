//! open-pr: push a branch and open a pull request for it

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, hyperlink};
use anstream::println;
use backdate::error::{Error, Result};
use backdate::platform::PrCreate;
use backdate::publish::push_branch;
use clap::Args;
use tracing::{debug, warn};

/// Arguments for `open-pr`
#[derive(Debug, Args)]
pub struct OpenPrArgs {
    /// Head branch
    #[arg(long)]
    pub branch: String,

    /// Base branch (defaults to the configured base branch)
    #[arg(long)]
    pub base: Option<String>,

    /// PR title (defaults to the branch name)
    #[arg(long)]
    pub title: Option<String>,

    /// PR body
    #[arg(long)]
    pub body: Option<String>,

    /// Open as a draft
    #[arg(long)]
    pub draft: bool,
}

/// Run `open-pr`
pub fn run(ctx: &CommandContext, args: &OpenPrArgs) -> Result<()> {
    let base = ctx.base();
    let git = ctx.git();

    if !git.branch_exists(&args.branch)? {
        return Err(Error::Domain(format!(
            "branch '{}' does not exist locally; run create-branch and commit first",
            args.branch
        )));
    }

    push_branch(&git, ctx.remote(), &args.branch)?;

    match git.ahead_behind(base, &args.branch) {
        Ok(counts) if counts.ahead == 0 => warn!(
            branch = %args.branch,
            base,
            "no commits ahead of base; the pull request may be empty"
        ),
        Ok(_) => {}
        Err(e) => debug!(error = %e.summary(), "could not compare branch with base"),
    }

    let pr = PrCreate {
        head: args.branch.clone(),
        base: base.to_string(),
        title: args.title.clone().unwrap_or_else(|| args.branch.clone()),
        body: args.body.clone().unwrap_or_default(),
        draft: args.draft,
    };
    let github = ctx.github();

    if ctx.dry_run() {
        github.open_pull_request(&pr)?;
        return Ok(());
    }

    let number = github.create_pull_request(&pr)?;
    let details = github.pull_request(number)?;
    let label = format!("#{number}");
    match details.url.as_deref() {
        Some(url) => println!("{} Opened {} {}", check(), label.accent(), hyperlink(url, url)),
        None => println!("{} Opened {}", check(), label.accent()),
    }
    Ok(())
}
