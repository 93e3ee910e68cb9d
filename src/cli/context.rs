//! Shared command context for CLI commands
//!
//! Extracts the setup every command needs: the runner (real or dry-run),
//! the working tree, the GitHub token and the resolved commit identity.

use backdate::backdate::{CommitEnvironment, CommitIdentity};
use backdate::config::Config;
use backdate::error::Result;
use backdate::identity::{GhIdentityResolver, hydrate};
use backdate::platform::GitHubCli;
use backdate::process::{CommandRunner, DryRunRunner, InterruptFlag, SystemRunner};
use backdate::vcs::Git;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// Shared context for CLI commands
pub struct CommandContext {
    /// Resolved configuration
    pub config: Config,
    /// Working tree commands operate on
    pub repo_dir: PathBuf,
    runner: Box<dyn CommandRunner>,
    token: Option<String>,
    identity: OnceCell<CommitIdentity>,
}

impl CommandContext {
    /// Build the context, wrapping the runner for dry-run when configured
    pub fn new(config: Config, repo_dir: PathBuf, interrupt: InterruptFlag) -> Self {
        let system = SystemRunner::new(interrupt);
        let runner: Box<dyn CommandRunner> = if config.dry_run {
            Box::new(DryRunRunner::new(system))
        } else {
            Box::new(system)
        };
        Self::with_runner(config, repo_dir, runner)
    }

    /// Build the context around an existing runner
    pub fn with_runner(config: Config, repo_dir: PathBuf, runner: Box<dyn CommandRunner>) -> Self {
        let token = config.token(|key| std::env::var(key).ok());
        Self {
            config,
            repo_dir,
            runner,
            token,
            identity: OnceCell::new(),
        }
    }

    /// The runner every operation goes through
    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    /// Whether mutating commands are suppressed
    pub fn dry_run(&self) -> bool {
        self.runner.is_dry_run()
    }

    /// Git in the context's working tree
    pub fn git(&self) -> Git<'_> {
        Git::new(self.runner(), self.repo_dir.clone())
    }

    /// Git in another directory
    pub fn git_at(&self, dir: &Path) -> Git<'_> {
        Git::new(self.runner(), dir)
    }

    /// `gh` in the context's working tree
    pub fn github(&self) -> GitHubCli<'_> {
        GitHubCli::new(self.runner(), Some(self.repo_dir.clone())).with_token(self.token.clone())
    }

    /// Commit identity, resolved at most once per run
    pub fn identity(&self) -> &CommitIdentity {
        self.identity.get_or_init(|| {
            let resolver = GhIdentityResolver::new(self.runner(), self.token.clone());
            hydrate(&self.config, &resolver)
        })
    }

    /// Environment for a commit at `date`
    pub fn commit_env(&self, date: Option<&str>) -> Result<CommitEnvironment> {
        CommitEnvironment::build(date, self.identity())
    }

    /// Branch work is merged into
    pub fn base(&self) -> &str {
        &self.config.base_branch
    }

    /// Configured remote
    pub fn remote(&self) -> &str {
        &self.config.remote_name
    }
}

#[cfg(test)]
pub mod testing {
    use super::CommandContext;
    use backdate::config::{Config, PersonConfig};
    use backdate::process::testing::ScriptedRunner;
    use std::path::Path;
    use std::sync::Arc;

    /// Context over a scripted runner, with a fully configured identity so
    /// no `gh api` lookups are made
    pub fn scripted_context(runner: &Arc<ScriptedRunner>, dir: &Path) -> CommandContext {
        let config = Config {
            author: PersonConfig {
                name: Some("Ada Lovelace".into()),
                email: Some("ada@example.com".into()),
            },
            committer: PersonConfig {
                name: Some("ada-gh".into()),
                email: Some("ada@example.com".into()),
            },
            ..Config::default()
        };
        CommandContext::with_runner(config, dir.to_path_buf(), Box::new(Arc::clone(runner)))
    }
}
