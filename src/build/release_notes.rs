//! Release notes parsing
//!
//! Two layouts are accepted. The extended one uses a heading per release:
//!
//! ```text
//! ### New in 1.2.0 (Released 2017/03/01)
//! * Added netstandard1.6 target
//! * Fixed version patching
//! ```
//!
//! The simple one keeps each release on a single bullet line:
//!
//! ```text
//! * 1.2.0 - Added netstandard1.6 target; Fixed version patching
//! ```
//!
//! Releases are listed newest first, so the first entry is the current one.

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// Default location relative to the repository root
pub const RELEASE_NOTES_FILE: &str = "ReleaseNotes.md";

#[derive(Debug, Error)]
pub enum ReleaseNotesError {
    #[error("Failed to read release notes from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Release notes contain no entries")]
    Empty,

    #[error("Unrecognised release notes header: {0}")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseNotes {
    pub version: String,
    pub released: Option<NaiveDate>,
    pub notes: Vec<String>,
}

fn version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)*(?:-[0-9A-Za-z.\-]+)?").expect("valid regex"))
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})").expect("valid regex"))
}

impl ReleaseNotes {
    pub fn from_file(path: &Path) -> Result<Self, ReleaseNotesError> {
        let content = fs::read_to_string(path).map_err(|source| ReleaseNotesError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses the newest entry
    pub fn parse(content: &str) -> Result<Self, ReleaseNotesError> {
        let first = content
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .ok_or(ReleaseNotesError::Empty)?;

        if first.starts_with('#') {
            Self::parse_extended(content)
        } else if first.starts_with('*') || first.starts_with('-') {
            Self::parse_simple(first)
        } else {
            Err(ReleaseNotesError::UnknownFormat(first.to_string()))
        }
    }

    fn parse_extended(content: &str) -> Result<Self, ReleaseNotesError> {
        let mut lines = content.lines().map(str::trim).skip_while(|l| l.is_empty());

        let header = lines.next().ok_or(ReleaseNotesError::Empty)?;
        let version = version_re()
            .find(header)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| ReleaseNotesError::UnknownFormat(header.to_string()))?;
        let released = parse_date(header);

        let notes = lines
            .take_while(|l| !l.starts_with('#'))
            .filter_map(strip_bullet)
            .collect();

        Ok(Self {
            version,
            released,
            notes,
        })
    }

    fn parse_simple(line: &str) -> Result<Self, ReleaseNotesError> {
        let body = strip_bullet(line).unwrap_or_default();
        let m = version_re()
            .find(&body)
            .ok_or_else(|| ReleaseNotesError::UnknownFormat(line.to_string()))?;

        let rest = body[m.end()..].trim_start().trim_start_matches('-');
        let notes = rest
            .split(';')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            version: m.as_str().to_string(),
            released: None,
            notes,
        })
    }
}

fn strip_bullet(line: &str) -> Option<String> {
    let text = line
        .strip_prefix('*')
        .or_else(|| line.strip_prefix('-'))?
        .trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn parse_date(header: &str) -> Option<NaiveDate> {
    let caps = date_re().captures(header)?;
    NaiveDate::from_ymd_opt(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    )
}
