//! Host variable namespace and timing configuration.
//!
//! Keywords read their timeouts, poll interval, blank-ignore switch and table
//! tokens from a flat [`Variables`] store keyed by `${NAME}`. Values are kept
//! as strings the way a test runner hands them over and are parsed on read.

use crate::poll::{secs, PollSpec};
use crate::result::{OkwError, OkwResult};
use crate::tokens::Tokens;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::warn;

/// Poll interval variable
pub const POLL_VERIFY_VAR: &str = "${OKW_POLL_VERIFY}";
/// Blank-ignore switch variable
pub const IGNORE_EMPTY_VAR: &str = "${OKW_IGNORE_EMPTY}";
/// Cell separator override
pub const CELL_SEP_VAR: &str = "${OKW_TABLE_CELL_SEP_TOKEN}";
/// Row separator override
pub const ROW_SEP_VAR: &str = "${OKW_TABLE_ROW_SEP_TOKEN}";
/// Empty-cell token override
pub const EMPTY_CELL_VAR: &str = "${OKW_TABLE_EMPTY_CELL_TOKEN}";
/// Empty-column token override
pub const EMPTY_COL_VAR: &str = "${OKW_TABLE_EMPTY_COL_TOKEN}";
/// Empty-table token override
pub const EMPTY_TABLE_VAR: &str = "${OKW_TABLE_EMPTY_TABLE_TOKEN}";
/// Ignore token override
pub const IGNORE_TOKEN_VAR: &str = "${OKW_IGNORE_TOKEN}";
/// Empty-value token override
pub const EMPTY_TOKEN_VAR: &str = "${OKW_EMPTY_TOKEN}";
/// Delete token override
pub const DELETE_TOKEN_VAR: &str = "${OKW_DELETE_TOKEN}";

/// Default poll interval in seconds
pub const DEFAULT_POLL_SECS: f64 = 0.1;

/// Parameter name accepted by `SetOKWParameter` for the poll interval
pub const POLL_VERIFY_PARAMETER: &str = "PollVerify";

// =============================================================================
// Verification families
// =============================================================================

/// A group of verify keywords sharing one timeout variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerifyFamily {
    /// VerifyValue*
    Value,
    /// VerifyTooltip*
    Tooltip,
    /// VerifyPlaceholder*
    Placeholder,
    /// VerifyLabel*
    Label,
    /// VerifyCaption*
    Caption,
    /// VerifyAttribute*
    Attribute,
    /// VerifyExist
    Exist,
    /// VerifyIsVisible
    Visible,
    /// VerifyIsEnabled
    Enabled,
    /// VerifyIsEditable
    Editable,
    /// VerifyIsFocusable
    Focusable,
    /// VerifyIsClickable
    Clickable,
    /// VerifyHasFocus
    Focus,
    /// VerifyTable*
    Table,
    /// VerifyListCount, VerifySelectedCount
    List,
}

impl VerifyFamily {
    /// Every family
    pub const ALL: [Self; 15] = [
        Self::Value,
        Self::Tooltip,
        Self::Placeholder,
        Self::Label,
        Self::Caption,
        Self::Attribute,
        Self::Exist,
        Self::Visible,
        Self::Enabled,
        Self::Editable,
        Self::Focusable,
        Self::Clickable,
        Self::Focus,
        Self::Table,
        Self::List,
    ];

    /// Timeout variable, e.g. `${OKW_TIMEOUT_VERIFY_VALUE}`
    pub const fn variable(self) -> &'static str {
        match self {
            Self::Value => "${OKW_TIMEOUT_VERIFY_VALUE}",
            Self::Tooltip => "${OKW_TIMEOUT_VERIFY_TOOLTIP}",
            Self::Placeholder => "${OKW_TIMEOUT_VERIFY_PLACEHOLDER}",
            Self::Label => "${OKW_TIMEOUT_VERIFY_LABEL}",
            Self::Caption => "${OKW_TIMEOUT_VERIFY_CAPTION}",
            Self::Attribute => "${OKW_TIMEOUT_VERIFY_ATTRIBUTE}",
            Self::Exist => "${OKW_TIMEOUT_VERIFY_EXIST}",
            Self::Visible => "${OKW_TIMEOUT_VERIFY_VISIBLE}",
            Self::Enabled => "${OKW_TIMEOUT_VERIFY_ENABLED}",
            Self::Editable => "${OKW_TIMEOUT_VERIFY_EDITABLE}",
            Self::Focusable => "${OKW_TIMEOUT_VERIFY_FOCUSABLE}",
            Self::Clickable => "${OKW_TIMEOUT_VERIFY_CLICKABLE}",
            Self::Focus => "${OKW_TIMEOUT_VERIFY_FOCUS}",
            Self::Table => "${OKW_TIMEOUT_VERIFY_TABLE}",
            Self::List => "${OKW_TIMEOUT_VERIFY_LIST}",
        }
    }

    /// Name accepted by `SetOKWParameter`
    pub const fn parameter_name(self) -> &'static str {
        match self {
            Self::Value => "TimeOutVerifyValue",
            Self::Tooltip => "TimeOutVerifyTooltip",
            Self::Placeholder => "TimeOutVerifyPlaceholder",
            Self::Label => "TimeOutVerifyLabel",
            Self::Caption => "TimeOutVerifyCaption",
            Self::Attribute => "TimeOutVerifyAttribute",
            Self::Exist => "TimeOutVerifyExist",
            Self::Visible => "TimeOutVerifyVisible",
            Self::Enabled => "TimeOutVerifyEnabled",
            Self::Editable => "TimeOutVerifyEditable",
            Self::Focusable => "TimeOutVerifyFocusable",
            Self::Clickable => "TimeOutVerifyClickable",
            Self::Focus => "TimeOutVerifyFocus",
            Self::Table => "TimeOutVerifyTable",
            Self::List => "TimeOutVerifyList",
        }
    }

    /// Timeout used when the variable is unset, in seconds
    pub const fn default_timeout_secs(self) -> f64 {
        match self {
            Self::Value
            | Self::Tooltip
            | Self::Placeholder
            | Self::Label
            | Self::Caption
            | Self::Attribute => 10.0,
            _ => 2.0,
        }
    }
}

impl fmt::Display for VerifyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.parameter_name())
    }
}

/// Map a `SetOKWParameter` name to its variable, ignoring case
pub fn parameter_variable(name: &str) -> OkwResult<&'static str> {
    let wanted = name.trim();
    if wanted.eq_ignore_ascii_case(POLL_VERIFY_PARAMETER) {
        return Ok(POLL_VERIFY_VAR);
    }
    VerifyFamily::ALL
        .iter()
        .find(|family| family.parameter_name().eq_ignore_ascii_case(wanted))
        .map(|family| family.variable())
        .ok_or_else(|| OkwError::invalid_argument(format!("Unsupported OKW parameter: {name}")))
}

// =============================================================================
// Time values
// =============================================================================

/// Parse a time value into seconds
///
/// Accepts plain numbers (`1.5`), unit suffixes (`500ms`, `2s`, `3 sec`,
/// `1 minute`) and compact sums (`1m30s`, `1 min 30 s`).
pub fn parse_time(value: &str) -> Option<f64> {
    let text = value.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(number) = text.parse::<f64>() {
        return number.is_finite().then_some(number);
    }

    let lower = text.to_ascii_lowercase();
    let mut rest = lower.as_str();
    let mut total = 0.0;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return None;
        }
        let number: f64 = rest[..number_len].parse().ok()?;
        rest = rest[number_len..].trim_start();

        let unit_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        total += number * unit_factor(&rest[..unit_len])?;
        rest = rest[unit_len..].trim_start();
    }
    Some(total)
}

fn unit_factor(unit: &str) -> Option<f64> {
    match unit {
        "ms" | "millis" | "millisecond" | "milliseconds" => Some(0.001),
        "s" | "sec" | "secs" | "second" | "seconds" => Some(1.0),
        "m" | "min" | "mins" | "minute" | "minutes" => Some(60.0),
        "h" | "hour" | "hours" => Some(3600.0),
        _ => None,
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_uppercase().as_str(),
        "YES" | "TRUE" | "1"
    )
}

// =============================================================================
// Variable store
// =============================================================================

/// Flat `${NAME}` to string store shared with the test runner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `NAME`, `$NAME` and `${NAME}` to `${NAME}`
    pub fn normalize_name(name: &str) -> String {
        let name = name.trim();
        if name.starts_with("${") && name.ends_with('}') {
            name.to_string()
        } else if let Some(bare) = name.strip_prefix('$') {
            format!("${{{bare}}}")
        } else {
            format!("${{{name}}}")
        }
    }

    /// Set a variable
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(Self::normalize_name(name), value.into());
    }

    /// Builder form of [`Variables::set`]
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Read a variable
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&Self::normalize_name(name)).map(String::as_str)
    }

    /// Read a variable or fall back to `default`
    pub fn get_config(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or(default).to_string()
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Read a time variable in seconds; unparsable values log and fall back
    pub fn seconds(&self, name: &str, default: f64) -> f64 {
        match self.get(name) {
            None => default,
            Some(raw) => parse_time(raw).unwrap_or_else(|| {
                warn!(
                    variable = name,
                    value = raw,
                    default,
                    "unparsable time value, using default"
                );
                default
            }),
        }
    }

    /// Poll interval in seconds
    pub fn poll_interval(&self) -> f64 {
        self.seconds(POLL_VERIFY_VAR, DEFAULT_POLL_SECS)
    }

    /// Timing for one verification family
    pub fn poll_spec(&self, family: VerifyFamily) -> PollSpec {
        PollSpec::new(secs(
            self.seconds(family.variable(), family.default_timeout_secs()),
        ))
        .with_poll_interval(secs(self.poll_interval()))
    }

    /// Whether blank arguments are skipped like `$IGNORE`
    pub fn ignore_empty(&self) -> bool {
        self.get(IGNORE_EMPTY_VAR).is_some_and(is_truthy)
    }

    /// Sentinel and table tokens with any overrides applied
    pub fn tokens(&self) -> Tokens {
        let defaults = Tokens::default();
        Tokens {
            cell_sep: self.get_config(CELL_SEP_VAR, &defaults.cell_sep),
            row_sep: self.get_config(ROW_SEP_VAR, &defaults.row_sep),
            empty_cell: self.get_config(EMPTY_CELL_VAR, &defaults.empty_cell),
            empty_col: self.get_config(EMPTY_COL_VAR, &defaults.empty_col),
            empty_table: self.get_config(EMPTY_TABLE_VAR, &defaults.empty_table),
            ignore: self.get_config(IGNORE_TOKEN_VAR, &defaults.ignore),
            empty: self.get_config(EMPTY_TOKEN_VAR, &defaults.empty),
            delete: self.get_config(DELETE_TOKEN_VAR, &defaults.delete),
        }
    }

    /// Load a flat YAML mapping of scalars
    ///
    /// Booleans become `TRUE`/`FALSE`, numbers their decimal text and null
    /// the empty string.
    pub fn from_yaml_str(yaml: &str) -> OkwResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::new());
        }
        let mapping: serde_yaml_ng::Mapping = serde_yaml_ng::from_str(yaml)
            .map_err(|e| OkwError::model(format!("invalid variable file: {e}")))?;
        let mut vars = Self::new();
        for (key, value) in mapping {
            let name = scalar_text(&key)
                .ok_or_else(|| OkwError::model("variable names must be scalars"))?;
            let text = scalar_text(&value).ok_or_else(|| {
                OkwError::model(format!("variable '{name}' must be a scalar"))
            })?;
            vars.set(&name, text);
        }
        Ok(vars)
    }

    /// Load a variable file from disk
    pub fn from_yaml_file(path: impl AsRef<Path>) -> OkwResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Merge another store over this one
    pub fn extend(&mut self, other: Self) {
        self.values.extend(other.values);
    }
}

fn scalar_text(value: &serde_yaml_ng::Value) -> Option<String> {
    use serde_yaml_ng::Value;
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("TRUE".to_string()),
        Value::Bool(false) => Some("FALSE".to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::result::ErrorKind;
    use std::io::Write;
    use std::time::Duration;

    mod family_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            assert!((VerifyFamily::Value.default_timeout_secs() - 10.0).abs() < f64::EPSILON);
            assert!((VerifyFamily::Placeholder.default_timeout_secs() - 10.0).abs() < f64::EPSILON);
            assert!((VerifyFamily::Table.default_timeout_secs() - 2.0).abs() < f64::EPSILON);
            assert!((VerifyFamily::Focus.default_timeout_secs() - 2.0).abs() < f64::EPSILON);
        }

        #[test]
        fn test_variables_unique() {
            let mut names: Vec<_> = VerifyFamily::ALL.iter().map(|f| f.variable()).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), 15);
        }

        #[test]
        fn test_parameter_lookup() {
            assert_eq!(
                parameter_variable("timeoutverifyvalue").unwrap(),
                "${OKW_TIMEOUT_VERIFY_VALUE}"
            );
            assert_eq!(
                parameter_variable("TimeOutVerifyTable").unwrap(),
                "${OKW_TIMEOUT_VERIFY_TABLE}"
            );
            assert_eq!(parameter_variable("POLLVERIFY").unwrap(), POLL_VERIFY_VAR);
        }

        #[test]
        fn test_unknown_parameter() {
            let err = parameter_variable("Speed").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            assert_eq!(err.to_string(), "Unsupported OKW parameter: Speed");
        }
    }

    mod time_tests {
        use super::*;

        fn approx(value: Option<f64>, expected: f64) -> bool {
            value.is_some_and(|v| (v - expected).abs() < 1e-9)
        }

        #[test]
        fn test_plain_numbers() {
            assert!(approx(parse_time("2"), 2.0));
            assert!(approx(parse_time(" 0.5 "), 0.5));
        }

        #[test]
        fn test_suffixes() {
            assert!(approx(parse_time("500ms"), 0.5));
            assert!(approx(parse_time("2s"), 2.0));
            assert!(approx(parse_time("3 sec"), 3.0));
            assert!(approx(parse_time("1 second"), 1.0));
            assert!(approx(parse_time("2 min"), 120.0));
            assert!(approx(parse_time("1 minute"), 60.0));
        }

        #[test]
        fn test_compact() {
            assert!(approx(parse_time("1m30s"), 90.0));
            assert!(approx(parse_time("1 min 30 s"), 90.0));
            assert!(approx(parse_time("1s500ms"), 1.5));
        }

        #[test]
        fn test_invalid() {
            assert!(parse_time("").is_none());
            assert!(parse_time("soon").is_none());
            assert!(parse_time("5 fortnights").is_none());
            assert!(parse_time("1 2").is_none());
        }
    }

    mod variables_tests {
        use super::*;

        #[test]
        fn test_name_normalization() {
            assert_eq!(Variables::normalize_name("X"), "${X}");
            assert_eq!(Variables::normalize_name("$X"), "${X}");
            assert_eq!(Variables::normalize_name("${X}"), "${X}");
            let vars = Variables::new().with("OKW_POLL_VERIFY", "0.2");
            assert_eq!(vars.get("${OKW_POLL_VERIFY}"), Some("0.2"));
            assert_eq!(vars.get("$OKW_POLL_VERIFY"), Some("0.2"));
        }

        #[test]
        fn test_poll_spec_defaults() {
            let vars = Variables::new();
            let spec = vars.poll_spec(VerifyFamily::Value);
            assert_eq!(spec.timeout, Duration::from_secs(10));
            assert_eq!(spec.poll_interval, Duration::from_millis(100));
            assert_eq!(vars.poll_spec(VerifyFamily::List).timeout, Duration::from_secs(2));
        }

        #[test]
        fn test_poll_spec_overrides() {
            let vars = Variables::new()
                .with(VerifyFamily::Table.variable(), "500ms")
                .with(POLL_VERIFY_VAR, "0.05");
            let spec = vars.poll_spec(VerifyFamily::Table);
            assert_eq!(spec.timeout, Duration::from_millis(500));
            assert_eq!(spec.poll_interval, Duration::from_millis(50));
        }

        #[test]
        fn test_unparsable_falls_back() {
            let vars = Variables::new().with(VerifyFamily::Exist.variable(), "later");
            assert_eq!(vars.poll_spec(VerifyFamily::Exist).timeout, Duration::from_secs(2));
        }

        #[test]
        fn test_ignore_empty() {
            assert!(!Variables::new().ignore_empty());
            assert!(Variables::new().with(IGNORE_EMPTY_VAR, "yes").ignore_empty());
            assert!(Variables::new().with(IGNORE_EMPTY_VAR, "TRUE").ignore_empty());
            assert!(!Variables::new().with(IGNORE_EMPTY_VAR, "NO").ignore_empty());
        }

        #[test]
        fn test_token_overrides() {
            let vars = Variables::new().with(CELL_SEP_VAR, "|");
            let tokens = vars.tokens();
            assert_eq!(tokens.cell_sep, "|");
            assert_eq!(tokens.row_sep, "$LF");
            assert_eq!(tokens.parse_row_pattern("a|b"), vec!["a", "b"]);
        }

        #[test]
        fn test_sentinel_token_overrides() {
            let tokens = Variables::new()
                .with(IGNORE_TOKEN_VAR, "#SKIP")
                .with(EMPTY_TOKEN_VAR, "#NONE")
                .with(DELETE_TOKEN_VAR, "#CLEAR")
                .tokens();
            assert_eq!(tokens.ignore, "#SKIP");
            assert!(tokens.is_ignore_token("#skip"));
            assert!(!tokens.is_ignore_token("$IGNORE"));
            assert!(tokens.is_empty_token("#NONE"));
            assert!(tokens.is_delete_token("#CLEAR"));
            assert_eq!(Variables::new().tokens(), Tokens::default());
        }
    }

    mod yaml_tests {
        use super::*;

        #[test]
        fn test_from_yaml_str() {
            let vars = Variables::from_yaml_str(
                "OKW_TIMEOUT_VERIFY_VALUE: 3\nOKW_IGNORE_EMPTY: true\nOKW_POLL_VERIFY: 50ms\nNOTHING:\n",
            )
            .unwrap();
            assert_eq!(vars.get("OKW_TIMEOUT_VERIFY_VALUE"), Some("3"));
            assert_eq!(vars.get("OKW_IGNORE_EMPTY"), Some("TRUE"));
            assert_eq!(vars.get("NOTHING"), Some(""));
            assert!(vars.ignore_empty());
            assert!((vars.poll_interval() - 0.05).abs() < 1e-9);
        }

        #[test]
        fn test_nested_value_rejected() {
            let err = Variables::from_yaml_str("A:\n  B: 1\n").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Model);
        }

        #[test]
        fn test_invalid_yaml() {
            let err = Variables::from_yaml_str("a: [").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Model);
        }

        #[test]
        fn test_from_yaml_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "OKW_TIMEOUT_VERIFY_TABLE: 1m").unwrap();
            let vars = Variables::from_yaml_file(file.path()).unwrap();
            assert!((vars.seconds(VerifyFamily::Table.variable(), 2.0) - 60.0).abs() < 1e-9);
        }

        #[test]
        fn test_missing_file_is_io() {
            let dir = tempfile::tempdir().unwrap();
            let err = Variables::from_yaml_file(dir.path().join("nope.yaml")).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Io);
        }
    }
}
