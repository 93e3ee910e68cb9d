//! Layered configuration
//!
//! Sources, lowest precedence first: built-in defaults, the TOML config file,
//! environment variables, then explicit command-line overrides. The result
//! is immutable for the rest of the run.

mod file;

pub use file::{CONFIG_PATH_ENV, FileConfig, FilePerson, config_path, load_file};

use crate::error::Result;
use crate::types::Visibility;
use std::path::Path;
use tracing::debug;

/// Default base branch
pub const DEFAULT_BASE_BRANCH: &str = "main";
/// Default remote
pub const DEFAULT_REMOTE: &str = "origin";
/// Default token variable
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// A configured person; unset fields are resolved later
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonConfig {
    /// Display name
    pub name: Option<String>,
    /// Email address
    pub email: Option<String>,
}

impl PersonConfig {
    fn merge_file(&mut self, file: FilePerson) {
        set_if_present(&mut self.name, file.name.map(Some));
        set_if_present(&mut self.email, file.email.map(Some));
    }
}

/// Explicit values from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// `--base`
    pub base_branch: Option<String>,
    /// `--remote`
    pub remote_name: Option<String>,
    /// `--public` / `--private`
    pub visibility: Option<Visibility>,
    /// `--owner`
    pub owner: Option<String>,
    /// `--dry-run` (only ever turns dry-run on)
    pub dry_run: bool,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Branch that work is merged into
    pub base_branch: String,
    /// Remote to push to
    pub remote_name: String,
    /// Visibility for new repositories
    pub visibility: Visibility,
    /// Owner for new repositories
    pub owner: Option<String>,
    /// Author identity
    pub author: PersonConfig,
    /// Committer identity
    pub committer: PersonConfig,
    /// Name of the variable holding the GitHub token
    pub token_env: String,
    /// Print mutating commands instead of running them
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            remote_name: DEFAULT_REMOTE.to_string(),
            visibility: Visibility::default(),
            owner: None,
            author: PersonConfig::default(),
            committer: PersonConfig::default(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            dry_run: false,
        }
    }
}

impl Config {
    /// Load from the real process environment
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok(), overrides)
    }

    /// Load with an injectable environment lookup
    pub fn load_with(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path(path, &env) {
            debug!(path = %path.display(), "loading config file");
            config.apply_file(load_file(&path)?)?;
        }
        config.apply_env(&env)?;
        config.apply_overrides(overrides);

        debug!(?config, "configuration loaded");
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) -> Result<()> {
        set_if_present(&mut self.base_branch, file.base_branch);
        set_if_present(&mut self.remote_name, file.remote_name);
        if let Some(visibility) = non_empty(file.visibility) {
            self.visibility = visibility.parse()?;
        }
        set_if_present(&mut self.owner, file.owner.map(Some));
        set_if_present(&mut self.token_env, file.token_env);
        self.author.merge_file(file.author);
        self.committer.merge_file(file.committer);
        Ok(())
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |key: &str| non_empty(env(key));

        set_if_present(&mut self.base_branch, var("BACKDATE_BASE_BRANCH"));
        set_if_present(&mut self.remote_name, var("BACKDATE_REMOTE"));
        if let Some(visibility) = var("BACKDATE_VISIBILITY") {
            self.visibility = visibility.parse()?;
        }
        set_if_present(&mut self.owner, var("BACKDATE_OWNER").map(Some));
        set_if_present(&mut self.token_env, var("BACKDATE_TOKEN_ENV"));
        set_if_present(&mut self.author.name, var("GIT_AUTHOR_NAME").map(Some));
        set_if_present(&mut self.author.email, var("GIT_AUTHOR_EMAIL").map(Some));
        set_if_present(&mut self.committer.name, var("GIT_COMMITTER_NAME").map(Some));
        set_if_present(&mut self.committer.email, var("GIT_COMMITTER_EMAIL").map(Some));
        if let Some(flag) = var("BACKDATE_DRY_RUN") {
            self.dry_run = is_truthy(&flag);
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        set_if_present(&mut self.base_branch, overrides.base_branch.clone());
        set_if_present(&mut self.remote_name, overrides.remote_name.clone());
        if let Some(visibility) = overrides.visibility {
            self.visibility = visibility;
        }
        set_if_present(&mut self.owner, overrides.owner.clone().map(Some));
        self.dry_run |= overrides.dry_run;
    }

    /// The GitHub token, read from the configured variable
    pub fn token(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        non_empty(env(&self.token_env))
    }
}

fn set_if_present<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
