//! Match Evaluator
//!
//! Three comparison modes shared by every verify keyword:
//!
//! - `EXACT`: raw string equality
//! - `WCM`: wildcard, full-string, `*`/`?`, dot matches newline
//! - `REGX`: unanchored regex search
//!
//! Regex syntax errors surface as [`OkwError::InvalidPattern`] and are never
//! reported as a mismatch.

use crate::result::{OkwError, OkwResult};
use crate::tokens::wildcard_to_regex;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an expected value is compared with the actual one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchMode {
    /// Literal equality
    #[default]
    #[serde(rename = "EXACT")]
    Exact,
    /// Wildcard pattern
    #[serde(rename = "WCM")]
    Wildcard,
    /// Regular expression search
    #[serde(rename = "REGX")]
    Regex,
}

impl MatchMode {
    /// Keyword suffix form
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "EXACT",
            Self::Wildcard => "WCM",
            Self::Regex => "REGX",
        }
    }

    /// Human readable mismatch description
    pub fn describe_mismatch(self, actual: &str, expected: &str) -> String {
        match self {
            Self::Exact => format!("expected '{expected}', got '{actual}'"),
            Self::Wildcard => format!("value '{actual}' does not match pattern '{expected}'"),
            Self::Regex => format!("value '{actual}' does not match regex '{expected}'"),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = OkwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EXACT" | "" => Ok(Self::Exact),
            "WCM" | "WILDCARD" => Ok(Self::Wildcard),
            "REGX" | "REGEX" => Ok(Self::Regex),
            other => Err(OkwError::invalid_argument(format!(
                "Unknown match mode: '{other}'"
            ))),
        }
    }
}

/// An expected value compiled once for repeated matching
#[derive(Debug, Clone)]
pub struct Pattern {
    expected: String,
    mode: MatchMode,
    regex: Option<Regex>,
}

impl Pattern {
    /// Compile `expected` for `mode`
    pub fn compile(expected: &str, mode: MatchMode) -> OkwResult<Self> {
        let regex = match mode {
            MatchMode::Exact => None,
            MatchMode::Wildcard => Some(build(&wildcard_to_regex(expected), expected, true)?),
            MatchMode::Regex => Some(build(expected, expected, false)?),
        };
        Ok(Self {
            expected: expected.to_string(),
            mode,
            regex,
        })
    }

    /// Regex search where `.` also matches newlines
    pub fn regex_dotall(expected: &str) -> OkwResult<Self> {
        Ok(Self {
            expected: expected.to_string(),
            mode: MatchMode::Regex,
            regex: Some(build(expected, expected, true)?),
        })
    }

    /// Test a value
    pub fn is_match(&self, actual: &str) -> bool {
        match &self.regex {
            Some(re) => re.is_match(actual),
            None => actual == self.expected,
        }
    }

    /// The expected text as given
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// The match mode
    pub const fn mode(&self) -> MatchMode {
        self.mode
    }
}

fn build(source: &str, expected: &str, dot_all: bool) -> OkwResult<Regex> {
    RegexBuilder::new(source)
        .dot_matches_new_line(dot_all)
        .build()
        .map_err(|source| OkwError::InvalidPattern {
            pattern: expected.to_string(),
            source,
        })
}

/// Compare `actual` with `expected` under `mode`
pub fn is_match(actual: &str, expected: &str, mode: MatchMode) -> OkwResult<bool> {
    Ok(Pattern::compile(expected, mode)?.is_match(actual))
}

/// Like [`is_match`], failing with [`OkwError::CheckFailed`] on mismatch
pub fn assert_match(label: &str, actual: &str, expected: &str, mode: MatchMode) -> OkwResult<()> {
    if is_match(actual, expected, mode)? {
        Ok(())
    } else {
        Err(OkwError::check_failed(label, actual, expected, mode))
    }
}
