//! Configuration file discovery and parsing

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "BACKDATE_CONFIG";

/// Directory under the user config dir
const CONFIG_DIR: &str = "backdate";

/// Config file name
const CONFIG_FILE: &str = "config.toml";

/// A person as written in the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilePerson {
    /// Display name
    pub name: Option<String>,
    /// Email address
    pub email: Option<String>,
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Branch that work is merged into
    pub base_branch: Option<String>,
    /// Remote to push to
    pub remote_name: Option<String>,
    /// `private` or `public`
    pub visibility: Option<String>,
    /// Owner for new repositories
    pub owner: Option<String>,
    /// Name of the variable holding the GitHub token
    pub token_env: Option<String>,
    /// Author identity
    pub author: FilePerson,
    /// Committer identity
    pub committer: FilePerson,
}

/// Which config file to read, if any.
///
/// An explicit path wins, then `$BACKDATE_CONFIG`. Both are returned even if
/// missing so the caller can report them. The per-user default is only used
/// when it exists.
pub fn config_path(explicit: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
        .filter(|path| path.is_file())
}

/// Read and parse a config file
pub fn load_file(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "config file not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_full_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
base_branch = "trunk"
remote_name = "upstream"
visibility = "public"
owner = "octo-org"
token_env = "GH_PAT"

[author]
name = "Ada"
email = "ada@example.com"

[committer]
name = "octocat"
"#,
        )
        .unwrap();

        let file = load_file(&path).unwrap();
        assert_eq!(file.base_branch.as_deref(), Some("trunk"));
        assert_eq!(file.visibility.as_deref(), Some("public"));
        assert_eq!(file.author.email.as_deref(), Some("ada@example.com"));
        assert_eq!(file.committer.name.as_deref(), Some("octocat"));
        assert!(file.committer.email.is_none());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let result = load_file(&temp.path().join("nope.toml"));
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("not found")));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "base_brnach = \"main\"\n").unwrap();
        assert!(matches!(load_file(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_explicit_path_beats_env() {
        let explicit = PathBuf::from("/etc/backdate.toml");
        let path = config_path(Some(&explicit), |_| Some("/tmp/other.toml".into()));
        assert_eq!(path, Some(explicit));

        let path = config_path(None, |key| (key == CONFIG_PATH_ENV).then(|| "/tmp/other.toml".into()));
        assert_eq!(path, Some(PathBuf::from("/tmp/other.toml")));
    }
}
