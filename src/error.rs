//! Error types for backdate

use std::fmt;
use thiserror::Error;

/// Exit code for domain, validation, configuration and date errors
pub const EXIT_DOMAIN: i32 = 2;
/// Exit code for external command failures (including a missing tool)
pub const EXIT_COMMAND: i32 = 3;
/// Exit code when the user interrupted the run
pub const EXIT_INTERRUPTED: i32 = 130;

/// A failed external command, with everything it printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// Program and arguments, in order
    pub command: Vec<String>,
    /// Exit code (-1 when the child was killed by a signal)
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "command failed (exit {}): {}",
            self.exit_code,
            self.command.join(" ")
        )?;
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            write!(f, "\n--- stdout ---\n{stdout}")?;
        }
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            write!(f, "\n--- stderr ---\n{stderr}")?;
        }
        Ok(())
    }
}

/// Errors that can occur in backdate
#[derive(Error, Debug)]
pub enum Error {
    /// A required executable is not on `PATH`
    #[error("required tool not found on PATH: '{tool}'. {hint}")]
    ToolNotFound {
        /// Executable name
        tool: String,
        /// Where to get it
        hint: String,
    },

    /// An external process exited non-zero
    #[error("{0}")]
    Command(Box<CommandFailure>),

    /// A date string could not be normalized
    #[error("could not parse date: {0:?}")]
    DateParse(String),

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// A precondition of the requested operation does not hold
    #[error("{0}")]
    Domain(String),

    /// Local I/O failure (writing files, spawning processes)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The user pressed Ctrl-C
    #[error("interrupted")]
    Interrupted,
}

impl Error {
    /// Process exit code for this error kind
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ToolNotFound { .. } | Self::Command(_) => EXIT_COMMAND,
            Self::DateParse(_) | Self::Config(_) | Self::Domain(_) | Self::Io(_) => EXIT_DOMAIN,
            Self::Interrupted => EXIT_INTERRUPTED,
        }
    }

    /// The captured failure, if this is an external command error
    pub fn command_failure(&self) -> Option<&CommandFailure> {
        match self {
            Self::Command(failure) => Some(failure),
            _ => None,
        }
    }

    /// First line of the error message, for one-line reporting
    pub fn summary(&self) -> String {
        let text = self.to_string();
        text.lines().next().unwrap_or_default().to_string()
    }
}

impl From<CommandFailure> for Error {
    fn from(failure: CommandFailure) -> Self {
        Self::Command(Box::new(failure))
    }
}

/// Result type alias for backdate operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(stdout: &str, stderr: &str) -> CommandFailure {
        CommandFailure {
            command: vec!["git".into(), "push".into(), "origin".into(), "main".into()],
            exit_code: 1,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    #[test]
    fn test_command_failure_display_includes_streams() {
        let text = failure("out\n", "rejected\n").to_string();
        assert_eq!(
            text,
            "command failed (exit 1): git push origin main\n--- stdout ---\nout\n--- stderr ---\nrejected"
        );
    }

    #[test]
    fn test_command_failure_display_omits_empty_streams() {
        let text = failure("", "  ").to_string();
        assert_eq!(text, "command failed (exit 1): git push origin main");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::Domain("x".into()).exit_code(), 2);
        assert_eq!(Error::Config("x".into()).exit_code(), 2);
        assert_eq!(Error::DateParse("x".into()).exit_code(), 2);
        assert_eq!(Error::from(failure("", "")).exit_code(), 3);
        let missing = Error::ToolNotFound {
            tool: "gh".into(),
            hint: String::new(),
        };
        assert_eq!(missing.exit_code(), 3);
        assert_eq!(Error::Interrupted.exit_code(), 130);
    }

    #[test]
    fn test_summary_is_first_line() {
        let err = Error::from(failure("", "fatal: nope"));
        assert_eq!(err.summary(), "command failed (exit 1): git push origin main");
    }
}
