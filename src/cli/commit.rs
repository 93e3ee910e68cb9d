//! commit: backdated commit on an existing branch

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use backdate::error::Result;
use backdate::publish::push_branch;
use clap::Args;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Arguments for `commit`
#[derive(Debug, Args)]
pub struct CommitArgs {
    /// Branch to commit on
    #[arg(long)]
    pub branch: String,

    /// Commit date
    #[arg(long)]
    pub date: String,

    /// Commit message
    #[arg(long)]
    pub message: String,

    /// Allow a commit with no changes
    #[arg(long)]
    pub allow_empty: bool,

    /// Stage everything (`git add -A`) first
    #[arg(long)]
    pub add_all: bool,

    /// Append a line to this file (relative to the repository) and stage it
    #[arg(long)]
    pub touch: Option<String>,

    /// Push the branch afterwards
    #[arg(long)]
    pub push: bool,
}

/// Run `commit`
pub fn run(ctx: &CommandContext, args: &CommitArgs) -> Result<()> {
    let env = ctx.commit_env(Some(&args.date))?;
    let git = ctx.git();
    git.checkout(&args.branch)?;

    if let Some(touch) = &args.touch {
        if !ctx.dry_run() {
            touch_file(&ctx.repo_dir.join(touch), &args.date)?;
        }
        git.stage(&[touch.as_str()])?;
    }
    if args.add_all {
        git.stage(&["-A"])?;
    }
    git.commit(&args.message, &env, args.allow_empty)?;

    println!(
        "{} Committed on {}: {}",
        check(),
        args.branch.accent(),
        args.message
    );

    if args.push {
        push_branch(&git, ctx.remote(), &args.branch)?;
        println!("{} Pushed to {}", check(), ctx.remote().emphasis());
    }
    Ok(())
}

/// Create `path` if needed and append `line`, so the next commit is non-empty
fn touch_file(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_touch_creates_parents_and_appends() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes").join("log.txt");
        touch_file(&path, "2024-01-01").unwrap();
        touch_file(&path, "2024-01-02").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "2024-01-01\n2024-01-02\n");
    }
}
