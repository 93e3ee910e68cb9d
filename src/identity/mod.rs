//! Who the backdated commits belong to
//!
//! The authenticated `gh` account is the fallback for any identity field the
//! configuration leaves open. Lookups never fail: an unreachable or
//! unauthenticated `gh` yields [`Lookup::Unavailable`] and the caller keeps
//! whatever it already had.

use crate::backdate::CommitIdentity;
use crate::config::Config;
use crate::process::{CommandRunner, Invocation};
use crate::types::{Identity, Lookup};
use serde::Deserialize;
use tracing::{debug, warn};

const NOREPLY_DOMAIN: &str = "users.noreply.github.com";
const USER_QUERY: &str = r#"{login: .login, id: .id, name: (.name // "")}"#;
const EMAIL_QUERY: &str = "[.[] | select(.primary and .verified) | .email]";

/// Source of the hosting account's identity
pub trait IdentitySource {
    /// Display name, email and login of the authenticated account
    fn resolve_identity(&self) -> Lookup<Identity>;

    /// Login of the authenticated account
    fn resolve_login(&self) -> Lookup<String>;
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
    id: Option<u64>,
    #[serde(default)]
    name: String,
}

/// Resolves identity with `gh api`
pub struct GhIdentityResolver<'a> {
    runner: &'a dyn CommandRunner,
    token: Option<String>,
}

impl<'a> GhIdentityResolver<'a> {
    /// Resolver that authenticates with `token` when given
    pub fn new(runner: &'a dyn CommandRunner, token: Option<String>) -> Self {
        Self {
            runner,
            token: token.filter(|t| !t.is_empty()),
        }
    }

    fn api(&self, endpoint: &str, jq: &str) -> Result<String, String> {
        let mut inv = Invocation::gh(["api", endpoint, "--jq", jq])
            .read_only()
            .allow_failure();
        if let Some(token) = &self.token {
            inv = inv.env("GH_TOKEN", token.as_str());
        }
        match self.runner.run(&inv) {
            Ok(result) if result.success() => Ok(result.stdout),
            Ok(result) => Err(result.stderr.trim().to_string()),
            Err(e) => Err(e.summary()),
        }
    }

    fn user(&self) -> Lookup<ApiUser> {
        let stdout = match self.api("user", USER_QUERY) {
            Ok(stdout) => stdout,
            Err(reason) => return Lookup::Unavailable(reason),
        };
        match serde_json::from_str::<ApiUser>(stdout.trim()) {
            Ok(user) if !user.login.is_empty() => Lookup::Found(user),
            Ok(_) => Lookup::NotFound,
            Err(e) => Lookup::Unavailable(format!("unexpected `gh api user` output: {e}")),
        }
    }

    fn verified_email(&self) -> Option<String> {
        let stdout = self
            .api("user/emails", EMAIL_QUERY)
            .map_err(|reason| debug!(%reason, "verified email lookup failed"))
            .ok()?;
        serde_json::from_str::<Vec<String>>(stdout.trim())
            .ok()?
            .into_iter()
            .find(|email| !email.is_empty())
    }
}

impl IdentitySource for GhIdentityResolver<'_> {
    fn resolve_identity(&self) -> Lookup<Identity> {
        let user = match self.user() {
            Lookup::Found(user) => user,
            Lookup::NotFound => return Lookup::NotFound,
            Lookup::Unavailable(reason) => return Lookup::Unavailable(reason),
        };
        let email = self
            .verified_email()
            .unwrap_or_else(|| noreply_address(&user.login, user.id));
        let name = if user.name.trim().is_empty() {
            user.login.clone()
        } else {
            user.name
        };
        Lookup::Found(Identity {
            name,
            email,
            login: user.login,
        })
    }

    fn resolve_login(&self) -> Lookup<String> {
        match self.user() {
            Lookup::Found(user) => Lookup::Found(user.login),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Unavailable(reason) => Lookup::Unavailable(reason),
        }
    }
}

/// The address GitHub attributes to an account that hides its email
pub fn noreply_address(login: &str, id: Option<u64>) -> String {
    match id {
        Some(id) => format!("{id}+{login}@{NOREPLY_DOMAIN}"),
        None => format!("{login}@{NOREPLY_DOMAIN}"),
    }
}

/// Complete the configured identity from the hosting account.
///
/// Configured values always win. The resolver is only asked when a field is
/// missing, and at most once per kind of query.
pub fn hydrate(config: &Config, resolver: &dyn IdentitySource) -> CommitIdentity {
    let mut author_name = config.author.name.clone();
    let mut author_email = config.author.email.clone();
    let mut login = None;

    if author_name.is_none() || author_email.is_none() {
        match resolver.resolve_identity() {
            Lookup::Found(identity) => {
                author_name = author_name.or(Some(identity.name));
                author_email = author_email.or(Some(identity.email));
                login = Some(identity.login);
            }
            Lookup::NotFound => debug!("no authenticated account for identity"),
            Lookup::Unavailable(reason) => {
                warn!(%reason, "could not resolve identity from gh; git defaults apply");
            }
        }
    }

    let committer_name = config.committer.name.clone().or_else(|| {
        login
            .or_else(|| resolver.resolve_login().found())
            .or_else(|| author_name.clone())
    });
    let committer_email = config
        .committer
        .email
        .clone()
        .or_else(|| author_email.clone());

    let identity = CommitIdentity {
        author_name,
        author_email,
        committer_name,
        committer_email,
    };
    debug!(?identity, "resolved commit identity");
    identity
}
