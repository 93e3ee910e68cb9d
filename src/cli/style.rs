//! Terminal styling helpers

use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;

/// Semantic colors for CLI output, degrading to plain text when stdout is
/// not a color terminal
pub trait Stylize {
    /// De-emphasized detail
    fn muted(&self) -> String;
    /// Headline text
    fn emphasis(&self) -> String;
    /// Names of branches, PRs and remotes
    fn accent(&self) -> String;
    /// Completed actions
    fn success(&self) -> String;
    /// Soft failures
    fn warn(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn muted(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.dimmed()).to_string()
    }

    fn emphasis(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.bold()).to_string()
    }

    fn accent(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.cyan()).to_string()
    }

    fn success(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.green()).to_string()
    }

    fn warn(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.yellow()).to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    "✓".success()
}

/// `url` as a clickable link where the terminal supports it
pub fn hyperlink(text: &str, url: &str) -> String {
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        terminal_link::Link::new(text, url).to_string()
    } else {
        url.to_string()
    }
}
