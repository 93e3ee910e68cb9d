//! One-step retry with a designated alternative

use crate::error::{Error, Result};
use tracing::debug;

/// Which path produced a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    /// The primary operation succeeded
    Primary(T),
    /// The primary failed in an expected way and the fallback succeeded
    Fallback(T),
}

impl<T> Attempt<T> {
    /// The value, whichever path produced it
    pub fn into_inner(self) -> T {
        match self {
            Self::Primary(value) | Self::Fallback(value) => value,
        }
    }

    /// Whether the fallback was needed
    pub const fn used_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Run `primary`; if it fails with an error `should_fall_back` accepts, run
/// `fallback` once instead.
///
/// Errors the predicate rejects, and errors from the fallback itself, are
/// returned unchanged.
pub fn with_fallback<T, P, C, F>(primary: P, should_fall_back: C, fallback: F) -> Result<Attempt<T>>
where
    P: FnOnce() -> Result<T>,
    C: FnOnce(&Error) -> bool,
    F: FnOnce() -> Result<T>,
{
    match primary() {
        Ok(value) => Ok(Attempt::Primary(value)),
        Err(e) if should_fall_back(&e) => {
            debug!(error = %e.summary(), "primary attempt failed, trying fallback");
            fallback().map(Attempt::Fallback)
        }
        Err(e) => Err(e),
    }
}

/// Predicate that accepts any external command failure
pub const fn any_command_failure(error: &Error) -> bool {
    matches!(error, Error::Command(_))
}
