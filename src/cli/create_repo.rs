//! create-repo: new repository with a backdated initial commit

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use backdate::error::{Error, Result};
use backdate::platform::RepoCreate;
use backdate::types::Visibility;
use clap::Args;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Arguments for `create-repo`
#[derive(Debug, Args)]
pub struct CreateRepoArgs {
    /// Repository name (also the directory to create)
    pub name: String,

    /// GitHub user or organization to own the repository
    #[arg(long)]
    pub owner: Option<String>,

    /// Date of the initial commit (e.g. "2024-12-01 12:00:00")
    #[arg(long)]
    pub date: Option<String>,

    /// Create as private
    #[arg(long, conflicts_with = "public")]
    pub private: bool,

    /// Create as public
    #[arg(long)]
    pub public: bool,

    /// Repository description
    #[arg(long)]
    pub description: Option<String>,

    /// README file to create if missing
    #[arg(long, default_value = "README.md")]
    pub readme: String,

    /// Initial branch (defaults to the configured base branch)
    #[arg(long)]
    pub branch: Option<String>,
}

impl CreateRepoArgs {
    /// Visibility chosen on the command line, if any
    pub const fn visibility(&self) -> Option<Visibility> {
        if self.public {
            Some(Visibility::Public)
        } else if self.private {
            Some(Visibility::Private)
        } else {
            None
        }
    }
}

/// Run `create-repo`
pub fn run(ctx: &CommandContext, args: &CreateRepoArgs) -> Result<()> {
    let dir = ctx.repo_dir.join(&args.name);
    ensure_empty_target(&dir)?;

    let env = ctx.commit_env(args.date.as_deref())?;
    let base = ctx.base();
    let description = args.description.clone().unwrap_or_default();

    if !ctx.dry_run() {
        fs::create_dir_all(&dir)?;
    }
    let git = ctx.git_at(&dir);
    git.init(base)?;

    let readme = dir.join(&args.readme);
    if ctx.dry_run() {
        debug!(path = %readme.display(), "dry-run: not writing README");
    } else if !readme.exists() {
        fs::write(&readme, format!("# {}\n\n{description}\n", args.name))?;
    }
    git.stage(&[args.readme.as_str()])?;
    git.commit("Initial commit", &env, false)?;

    let spec = RepoCreate {
        name: args.name.clone(),
        source_dir: dir.clone(),
        visibility: ctx.config.visibility,
        remote: ctx.remote().to_string(),
        description: args.description.clone(),
        owner: ctx.config.owner.clone(),
    };
    ctx.github().create_repository(&spec)?;

    println!(
        "{} Created {} ({}) in {}",
        check(),
        spec.full_name().accent(),
        spec.visibility,
        dir.display().muted()
    );
    Ok(())
}

fn ensure_empty_target(dir: &Path) -> Result<()> {
    if dir.is_file() {
        return Err(Error::Domain(format!(
            "target exists and is not a directory: {}",
            dir.display()
        )));
    }
    if dir.is_dir() && fs::read_dir(dir)?.next().is_some() {
        return Err(Error::Domain(format!(
            "target directory already exists and is not empty: {}",
            dir.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_non_empty_target_is_refused() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("file.txt"), "x").unwrap();
        assert!(matches!(ensure_empty_target(temp.path()), Err(Error::Domain(_))));
    }

    #[test]
    fn test_empty_or_missing_target_is_fine() {
        let temp = TempDir::new().unwrap();
        assert!(ensure_empty_target(temp.path()).is_ok());
        assert!(ensure_empty_target(&temp.path().join("new")).is_ok());
    }
}
