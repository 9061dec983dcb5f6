//! Pattern/Token Engine
//!
//! Pure functions for table-pattern tokenization, wildcard conversion and
//! sentinel recognition.
//!
//! A backslash makes the following character literal, so `\$TAB` inside a row
//! pattern is the text `$TAB` and not a cell separator. Escaping wins over
//! both separator and sentinel recognition: `\$EMPTY` stays the literal text
//! `$EMPTY` instead of becoming an empty cell.

use crate::result::{OkwError, OkwResult};
use serde::{Deserialize, Serialize};

/// Default cell separator
pub const CELL_SEP_TOKEN: &str = "$TAB";
/// Default row separator
pub const ROW_SEP_TOKEN: &str = "$LF";
/// Default empty-cell token
pub const EMPTY_CELL_TOKEN: &str = "$EMPTY";
/// Default empty-column token
pub const EMPTY_COL_TOKEN: &str = "$EMPTYCOL";
/// Default empty-table token
pub const EMPTY_TABLE_TOKEN: &str = "$EMPTYTABLE";
/// Skip the keyword
pub const IGNORE_TOKEN: &str = "$IGNORE";
/// Explicit empty value
pub const EMPTY_TOKEN: &str = "$EMPTY";
/// Clear the field
pub const DELETE_TOKEN: &str = "$DELETE";

// =============================================================================
// Token set
// =============================================================================

/// Configurable sentinel strings used by keyword arguments and table patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tokens {
    /// Separates cells inside a row pattern
    pub cell_sep: String,
    /// Separates rows inside a column or table pattern
    pub row_sep: String,
    /// A cell that must be empty
    pub empty_cell: String,
    /// A column with no rows
    pub empty_col: String,
    /// A table with no rows
    pub empty_table: String,
    /// Skip the keyword entirely
    pub ignore: String,
    /// Explicit empty value for SetValue and friends
    pub empty: String,
    /// Clear the field
    pub delete: String,
}

impl Default for Tokens {
    fn default() -> Self {
        Self {
            cell_sep: CELL_SEP_TOKEN.to_string(),
            row_sep: ROW_SEP_TOKEN.to_string(),
            empty_cell: EMPTY_CELL_TOKEN.to_string(),
            empty_col: EMPTY_COL_TOKEN.to_string(),
            empty_table: EMPTY_TABLE_TOKEN.to_string(),
            ignore: IGNORE_TOKEN.to_string(),
            empty: EMPTY_TOKEN.to_string(),
            delete: DELETE_TOKEN.to_string(),
        }
    }
}

impl Tokens {
    /// Set the cell separator
    #[must_use]
    pub fn with_cell_sep(mut self, token: impl Into<String>) -> Self {
        self.cell_sep = token.into();
        self
    }

    /// Set the row separator
    #[must_use]
    pub fn with_row_sep(mut self, token: impl Into<String>) -> Self {
        self.row_sep = token.into();
        self
    }

    /// Set the empty-cell token
    #[must_use]
    pub fn with_empty_cell(mut self, token: impl Into<String>) -> Self {
        self.empty_cell = token.into();
        self
    }

    /// Set the empty-column token
    #[must_use]
    pub fn with_empty_col(mut self, token: impl Into<String>) -> Self {
        self.empty_col = token.into();
        self
    }

    /// Set the empty-table token
    #[must_use]
    pub fn with_empty_table(mut self, token: impl Into<String>) -> Self {
        self.empty_table = token.into();
        self
    }

    /// Split a row pattern into cell patterns
    ///
    /// Unescaped segments equal to `empty_cell` become `""`.
    pub fn parse_row_pattern(&self, pattern: &str) -> Vec<String> {
        split_segments(pattern, &self.cell_sep, false)
            .into_iter()
            .map(|seg| self.substitute_empty_cell(seg))
            .collect()
    }

    /// Split a column pattern into row entries
    ///
    /// The whole input being the empty-column token yields no entries at all.
    pub fn parse_column_pattern(&self, pattern: &str) -> Vec<String> {
        let segments = split_segments(pattern, &self.row_sep, false);
        if let [only] = segments.as_slice() {
            if !only.escaped && self.is_empty_column_token(&only.text) {
                return Vec::new();
            }
        }
        segments
            .into_iter()
            .map(|seg| self.substitute_empty_cell(seg))
            .collect()
    }

    /// Split a whole-table pattern into rows of cell patterns
    pub fn parse_table_pattern(&self, pattern: &str) -> Vec<Vec<String>> {
        if self.is_empty_table_token(pattern) {
            return Vec::new();
        }
        split_segments(pattern, &self.row_sep, true)
            .iter()
            .map(|row| self.parse_row_pattern(&row.text))
            .collect()
    }

    /// Exact comparison against the configured empty-cell token
    pub fn is_empty_cell(&self, value: &str) -> bool {
        value == self.empty_cell
    }

    /// The ignore token in any case, or its braced `${IGNORE}` form
    pub fn is_ignore_token(&self, value: &str) -> bool {
        is_sentinel(value, &self.ignore)
    }

    /// The empty token in any case, or its braced form
    pub fn is_empty_token(&self, value: &str) -> bool {
        is_sentinel(value, &self.empty)
    }

    /// The delete token in any case, or its braced form
    pub fn is_delete_token(&self, value: &str) -> bool {
        is_sentinel(value, &self.delete)
    }

    /// The empty-column token in any case, or its braced form
    pub fn is_empty_column_token(&self, value: &str) -> bool {
        is_sentinel(value, &self.empty_col)
    }

    /// The empty-table token in any case, or its braced form
    pub fn is_empty_table_token(&self, value: &str) -> bool {
        is_sentinel(value, &self.empty_table)
    }

    /// Whether a keyword argument means "skip this keyword"
    ///
    /// The ignore token always skips. A blank value skips only when
    /// `ignore_empty` is on. The empty token is data and never skips.
    pub fn should_ignore(&self, value: &str, ignore_empty: bool) -> bool {
        self.is_ignore_token(value) || (ignore_empty && value.trim().is_empty())
    }

    fn substitute_empty_cell(&self, seg: Segment) -> String {
        if !seg.escaped && seg.text == self.empty_cell {
            String::new()
        } else {
            seg.text
        }
    }
}

// =============================================================================
// Escaped splitting
// =============================================================================

#[derive(Debug)]
struct Segment {
    text: String,
    escaped: bool,
}

/// Split `input` on every unescaped occurrence of `separator`
///
/// A backslash makes the next character literal and is dropped; a trailing
/// lone backslash is kept. Empty input yields a single empty segment and an
/// empty separator never splits.
pub fn split_escaped(input: &str, separator: &str) -> Vec<String> {
    split_segments(input, separator, false)
        .into_iter()
        .map(|seg| seg.text)
        .collect()
}

/// With `keep_escapes`, escape sequences are copied through verbatim so a
/// second pass can still see them.
fn split_segments(input: &str, separator: &str, keep_escapes: bool) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    let mut rest = input;

    while let Some(ch) = rest.chars().next() {
        if ch == '\\' {
            let mut after = rest[1..].chars();
            match after.next() {
                Some(next) => {
                    if keep_escapes {
                        current.push('\\');
                    }
                    current.push(next);
                    escaped = true;
                    rest = after.as_str();
                }
                None => {
                    current.push('\\');
                    rest = "";
                }
            }
            continue;
        }
        if !separator.is_empty() && rest.starts_with(separator) {
            segments.push(Segment {
                text: std::mem::take(&mut current),
                escaped,
            });
            escaped = false;
            rest = &rest[separator.len()..];
            continue;
        }
        current.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    segments.push(Segment {
        text: current,
        escaped,
    });
    segments
}

// =============================================================================
// Wildcards
// =============================================================================

/// Convert a wildcard pattern to an anchored regex
///
/// `*` matches any sequence, `?` exactly one character; everything else is
/// literal.
pub fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 2);
    out.push('^');
    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    out.push('$');
    out
}

// =============================================================================
// Sentinels
// =============================================================================

/// Trimmed, case-insensitive comparison that also accepts the braced `${NAME}` form
///
/// A blank token never matches.
fn is_sentinel(value: &str, token: &str) -> bool {
    let (value, token) = (value.trim(), token.trim());
    if token.is_empty() {
        return false;
    }
    if value.eq_ignore_ascii_case(token) {
        return true;
    }
    match (token.strip_prefix('$'), value.strip_prefix("${")) {
        (Some(name), Some(inner)) => inner
            .strip_suffix('}')
            .is_some_and(|inner| inner.eq_ignore_ascii_case(name)),
        _ => false,
    }
}

// =============================================================================
// YES / NO
// =============================================================================

/// Expected state argument of the boolean verify keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    /// YES, TRUE or 1
    Yes,
    /// NO, FALSE or 0
    No,
}

impl YesNo {
    /// Parse a YES/NO argument, case-insensitive after trimming
    pub fn parse(value: &str) -> OkwResult<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "YES" | "TRUE" | "1" => Ok(Self::Yes),
            "NO" | "FALSE" | "0" => Ok(Self::No),
            _ => Err(OkwError::invalid_argument(format!(
                "Expected must be 'YES' or 'NO', got '{value}'"
            ))),
        }
    }

    /// As a boolean
    pub const fn as_bool(self) -> bool {
        matches!(self, Self::Yes)
    }

    /// Keyword return form
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
        }
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}
