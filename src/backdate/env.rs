//! Commit environment: the `GIT_*` variables that backdate a single commit

use super::date;
use crate::error::Result;
use std::collections::BTreeMap;

/// Author timestamp variable
pub const GIT_AUTHOR_DATE: &str = "GIT_AUTHOR_DATE";
/// Committer timestamp variable
pub const GIT_COMMITTER_DATE: &str = "GIT_COMMITTER_DATE";
/// Author name variable
pub const GIT_AUTHOR_NAME: &str = "GIT_AUTHOR_NAME";
/// Author email variable
pub const GIT_AUTHOR_EMAIL: &str = "GIT_AUTHOR_EMAIL";
/// Committer name variable
pub const GIT_COMMITTER_NAME: &str = "GIT_COMMITTER_NAME";
/// Committer email variable
pub const GIT_COMMITTER_EMAIL: &str = "GIT_COMMITTER_EMAIL";

/// Author and committer identity for a commit, any part of which may be unknown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitIdentity {
    /// Author display name
    pub author_name: Option<String>,
    /// Author email
    pub author_email: Option<String>,
    /// Committer display name (defaults to the author's)
    pub committer_name: Option<String>,
    /// Committer email (defaults to the author's)
    pub committer_email: Option<String>,
}

impl CommitIdentity {
    /// Identity where author and committer are the same person
    pub fn author(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            author_name: Some(name.into()),
            author_email: Some(email.into()),
            committer_name: None,
            committer_email: None,
        }
    }
}

/// Variables git reads for one commit operation.
///
/// Absent keys mean "inherit whatever git would use otherwise".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitEnvironment {
    vars: BTreeMap<&'static str, String>,
}

impl CommitEnvironment {
    /// Build the environment for a commit.
    ///
    /// The date, when given, is normalized and applied to both author and
    /// committer. Committer name/email fall back to the author's. Empty strings
    /// count as unknown.
    pub fn build(date: Option<&str>, identity: &CommitIdentity) -> Result<Self> {
        let mut vars = BTreeMap::new();

        if let Some(date) = non_empty(date) {
            let normalized = date::normalize(date)?;
            vars.insert(GIT_AUTHOR_DATE, normalized.clone());
            vars.insert(GIT_COMMITTER_DATE, normalized);
        }

        let author_name = non_empty(identity.author_name.as_deref());
        let author_email = non_empty(identity.author_email.as_deref());
        let committer_name = non_empty(identity.committer_name.as_deref()).or(author_name);
        let committer_email = non_empty(identity.committer_email.as_deref()).or(author_email);

        for (key, value) in [
            (GIT_AUTHOR_NAME, author_name),
            (GIT_AUTHOR_EMAIL, author_email),
            (GIT_COMMITTER_NAME, committer_name),
            (GIT_COMMITTER_EMAIL, committer_email),
        ] {
            if let Some(value) = value {
                vars.insert(key, value.to_string());
            }
        }

        Ok(Self { vars })
    }

    /// Value of a variable, if set
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Iterate over the variables in name order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.vars.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Whether no variable is set
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Number of variables set
    pub fn len(&self) -> usize {
        self.vars.len()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
