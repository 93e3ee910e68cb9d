//! Date normalization for git's date environment variables
//!
//! git accepts many date formats, but the ones we hand it are always
//! `YYYY-MM-DDTHH:MM:SSZ` so the recorded instant never depends on how git
//! interprets a zone-less string.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Output format understood by `GIT_AUTHOR_DATE` / `GIT_COMMITTER_DATE`
pub const GIT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
];

/// Normalize a user-supplied date into `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Zone-less input is read as local wall-clock time and converted with the
/// machine's current UTC offset.
pub fn normalize(input: &str) -> Result<String> {
    normalize_with_offset(input, *Local::now().offset())
}

/// Normalize with an explicit offset for zone-less input.
pub fn normalize_with_offset(input: &str, local_offset: FixedOffset) -> Result<String> {
    parse_with_offset(input, local_offset).map(|instant| instant.format(GIT_DATE_FORMAT).to_string())
}

/// Parse a user-supplied date into a UTC instant.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]` and `YYYY-MM-DDTHH:MM[:SS]`,
/// each optionally suffixed with `Z` or a `+HH:MM`/`-HH:MM` offset.
pub fn parse_with_offset(input: &str, local_offset: FixedOffset) -> Result<DateTime<Utc>> {
    let fail = || Error::DateParse(input.to_string());

    let mut s = input.trim().replacen(' ', "T", 1);
    if s.is_empty() {
        return Err(fail());
    }
    if s.len() == 10 && s.matches('-').count() == 2 {
        s.push_str("T00:00:00");
    }

    if let Some(rest) = s.strip_suffix('Z') {
        let naive = parse_naive(rest).ok_or_else(fail)?;
        return Ok(Utc.from_utc_datetime(&naive));
    }

    if let Some(with_offset) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&s, fmt).ok())
    {
        return Ok(with_offset.with_timezone(&Utc));
    }

    let naive = parse_naive(&s).ok_or_else(fail)?;
    local_offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(fail)
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
