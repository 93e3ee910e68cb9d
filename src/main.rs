//! backdate - backdated git history and GitHub pull requests

mod cli;

use anstream::eprintln;
use backdate::config::{Config, ConfigOverrides};
use backdate::error::{Error, Result};
use backdate::process::InterruptFlag;
use clap::{Parser, Subcommand};
use cli::context::CommandContext;
use cli::style::Stylize;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "backdate")]
#[command(about = "Backdated commits, pull requests and merges over git and the GitHub CLI")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $BACKDATE_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print mutating commands instead of running them
    #[arg(long, global = true)]
    dry_run: bool,

    /// More output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Remote to push to (overrides config)
    #[arg(long, global = true)]
    remote: Option<String>,

    /// Repository directory (defaults to the current directory)
    #[arg(short = 'C', long = "repo", global = true)]
    repo: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a repository with a backdated initial commit and publish it
    CreateRepo(cli::create_repo::CreateRepoArgs),

    /// Create a branch with a backdated empty commit
    CreateBranch(cli::create_branch::CreateBranchArgs),

    /// Make a backdated commit on a branch
    Commit(cli::commit::CommitArgs),

    /// Push a branch and open a pull request for it
    OpenPr(cli::open_pr::OpenPrArgs),

    /// Merge a branch or pull request with a backdated merge commit
    MergePr(cli::merge_pr::MergePrArgs),

    /// Commit, open a PR and merge it with backdated dates, in one go
    CommitAll(cli::commit_all::CommitAllArgs),
}

impl Cli {
    /// Command-line values that take precedence over file and environment
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            remote_name: self.remote.clone(),
            dry_run: self.dry_run,
            ..ConfigOverrides::default()
        };
        match &self.command {
            Commands::CreateRepo(args) => {
                overrides.base_branch.clone_from(&args.branch);
                overrides.visibility = args.visibility();
                overrides.owner.clone_from(&args.owner);
            }
            Commands::CreateBranch(args) => overrides.base_branch.clone_from(&args.base),
            Commands::OpenPr(args) => overrides.base_branch.clone_from(&args.base),
            Commands::MergePr(args) => overrides.base_branch.clone_from(&args.base),
            Commands::CommitAll(args) => overrides.base_branch.clone_from(&args.base),
            Commands::Commit(_) => {}
        }
        overrides
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref(), &cli.overrides());
    let dry_run = config.as_ref().map_or(cli.dry_run, |c| c.dry_run);
    init_tracing(cli.verbose, dry_run);

    match config.and_then(|config| run(cli, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

fn run(cli: Cli, config: Config) -> Result<()> {
    let interrupt = InterruptFlag::install().unwrap_or_else(|e| {
        warn!(error = %e, "could not install Ctrl-C handler");
        InterruptFlag::default()
    });
    let repo_dir = match cli.repo {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let ctx = CommandContext::new(config, repo_dir, interrupt);

    match &cli.command {
        Commands::CreateRepo(args) => cli::create_repo::run(&ctx, args),
        Commands::CreateBranch(args) => cli::create_branch::run(&ctx, args),
        Commands::Commit(args) => cli::commit::run(&ctx, args),
        Commands::OpenPr(args) => cli::open_pr::run(&ctx, args),
        Commands::MergePr(args) => cli::merge_pr::run(&ctx, args),
        Commands::CommitAll(args) => cli::commit_all::run(&ctx, args),
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the verbosity flags.
fn init_tracing(verbose: u8, dry_run: bool) {
    let level = match (verbose, dry_run) {
        (0, false) => "warn",
        (0 | 1, _) => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

fn report(e: &Error) {
    error!("{}", e.summary());
    if let Some(failure) = e.command_failure() {
        let stderr = failure.stderr.trim();
        if !stderr.is_empty() {
            eprintln!("{}", stderr.muted());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdate::types::Visibility;

    fn overrides(args: &[&str]) -> ConfigOverrides {
        Cli::try_parse_from(args).unwrap().overrides()
    }

    #[test]
    fn test_create_repo_flags_become_overrides() {
        let o = overrides(&[
            "backdate", "create-repo", "demo", "--public", "--owner", "acme", "--branch", "trunk",
        ]);
        assert_eq!(o.visibility, Some(Visibility::Public));
        assert_eq!(o.owner.as_deref(), Some("acme"));
        assert_eq!(o.base_branch.as_deref(), Some("trunk"));
    }

    #[test]
    fn test_base_flag_becomes_override() {
        let o = overrides(&[
            "backdate", "--remote", "upstream", "merge-pr", "--pr", "7", "--date", "2024-06-01",
            "--base", "develop",
        ]);
        assert_eq!(o.base_branch.as_deref(), Some("develop"));
        assert_eq!(o.remote_name.as_deref(), Some("upstream"));
        assert!(o.visibility.is_none());
    }

    #[test]
    fn test_no_flags_no_overrides() {
        let o = overrides(&[
            "backdate", "commit", "--branch", "x", "--date", "2024-06-01", "--message", "m",
        ]);
        assert!(o.base_branch.is_none());
        assert!(o.owner.is_none());
        assert!(!o.dry_run);
    }
}
