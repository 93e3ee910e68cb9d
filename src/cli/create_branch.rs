//! create-branch: new branch marked by a backdated empty commit

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use backdate::error::Result;
use backdate::publish::push_branch;
use clap::Args;

/// Arguments for `create-branch`
#[derive(Debug, Args)]
pub struct CreateBranchArgs {
    /// New branch name
    pub branch: String,

    /// Branch to start from (defaults to the configured base branch)
    #[arg(long)]
    pub base: Option<String>,

    /// Date of the branch's first commit
    #[arg(long)]
    pub date: String,

    /// Message for the first commit
    #[arg(long)]
    pub message: Option<String>,

    /// Push the new branch
    #[arg(long)]
    pub push: bool,
}

/// Default message for the empty commit that starts a branch
pub fn default_message(branch: &str) -> String {
    format!("chore({branch}): start branch")
}

/// Run `create-branch`
pub fn run(ctx: &CommandContext, args: &CreateBranchArgs) -> Result<()> {
    let env = ctx.commit_env(Some(&args.date))?;
    let base = ctx.base();
    let message = args
        .message
        .clone()
        .unwrap_or_else(|| default_message(&args.branch));

    let git = ctx.git();
    git.create_branch(&args.branch, base, ctx.remote())?;
    git.commit(&message, &env, true)?;

    println!(
        "{} Created {} from {}",
        check(),
        args.branch.accent(),
        base.accent()
    );

    if args.push {
        push_branch(&git, ctx.remote(), &args.branch)?;
        println!("{} Pushed to {}", check(), ctx.remote().emphasis());
    }
    Ok(())
}
