//! Result and error types for OKW.

use crate::matcher::MatchMode;
use crate::session::ContextError;
use thiserror::Error;

/// Result type for OKW operations
pub type OkwResult<T> = Result<T, OkwError>;

/// Coarse classification of an [`OkwError`], stable across message wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Host/app/window lifecycle called out of order
    PreconditionViolation,
    /// Widget, window, header, row key, model file or registry tag missing
    NotFound,
    /// Capability missing on the adapter or widget
    NotSupported,
    /// Poll deadline reached without a match
    Timeout,
    /// Malformed argument: count, regex, YES/NO token, parameter name
    InvalidArgument,
    /// Lookup matched more than one row where uniqueness is required
    Ambiguous,
    /// Single-shot assertion failed
    CheckFailed,
    /// File system failure
    Io,
    /// Locator model or variable file could not be parsed
    Model,
}

/// Errors that can occur in OKW
#[derive(Debug, Error)]
pub enum OkwError {
    /// Session state machine violation
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Lookup miss
    #[error("{message}")]
    NotFound {
        /// Error message
        message: String,
    },

    /// Capability not available
    #[error("{message}")]
    NotSupported {
        /// Error message
        message: String,
    },

    /// Verification did not succeed before the deadline
    #[error("{detail}")]
    Timeout {
        /// Human readable failure description
        detail: String,
        /// Expected value or pattern
        expected: String,
        /// Last observed value
        last: String,
        /// Match mode, when the check was pattern based
        mode: Option<MatchMode>,
    },

    /// Malformed argument
    #[error("{message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Regular expression failed to compile
    #[error("Invalid regex '{pattern}': {source}")]
    InvalidPattern {
        /// Offending pattern
        pattern: String,
        /// Underlying compile error
        source: regex::Error,
    },

    /// Lookup was not unique
    #[error("{message}")]
    Ambiguous {
        /// Error message
        message: String,
    },

    /// Single-shot match failed
    #[error("{message}")]
    CheckFailed {
        /// Error message
        message: String,
        /// Observed value
        actual: String,
        /// Expected value or pattern
        expected: String,
        /// Match mode used
        mode: MatchMode,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Model or variable file error
    #[error("Model error: {message}")]
    Model {
        /// Error message
        message: String,
    },

    /// Failure raised while running a keyword
    #[error("[{keyword}] {source}")]
    Keyword {
        /// Keyword name, e.g. `VerifyValue`
        keyword: String,
        /// Underlying failure
        source: Box<OkwError>,
    },
}

impl OkwError {
    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a not-supported error
    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::NotSupported {
            message: message.into(),
        }
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an ambiguity error
    pub fn ambiguous(message: impl Into<String>) -> Self {
        Self::Ambiguous {
            message: message.into(),
        }
    }

    /// Create a model error
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model {
            message: message.into(),
        }
    }

    /// Create a timeout error carrying the last observed value
    pub fn timeout(
        detail: impl Into<String>,
        expected: impl Into<String>,
        last: impl Into<String>,
        mode: Option<MatchMode>,
    ) -> Self {
        Self::Timeout {
            detail: detail.into(),
            expected: expected.into(),
            last: last.into(),
            mode,
        }
    }

    /// Create a single-shot mismatch error
    pub fn check_failed(label: &str, actual: &str, expected: &str, mode: MatchMode) -> Self {
        Self::CheckFailed {
            message: format!("{label} {}", mode.describe_mismatch(actual, expected)),
            actual: actual.to_string(),
            expected: expected.to_string(),
            mode,
        }
    }

    /// Attribute this error to a keyword; already attributed errors are kept as is
    #[must_use]
    pub fn in_keyword(self, keyword: impl Into<String>) -> Self {
        match self {
            Self::Keyword { .. } => self,
            other => Self::Keyword {
                keyword: keyword.into(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping keyword attribution
    pub fn root(&self) -> &Self {
        match self {
            Self::Keyword { source, .. } => source.root(),
            other => other,
        }
    }

    /// Keyword this error was raised in, if any
    pub fn keyword(&self) -> Option<&str> {
        match self {
            Self::Keyword { keyword, .. } => Some(keyword),
            _ => None,
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            Self::Context(ctx) => ctx.kind(),
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NotSupported { .. } => ErrorKind::NotSupported,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::InvalidArgument { .. } | Self::InvalidPattern { .. } => {
                ErrorKind::InvalidArgument
            }
            Self::Ambiguous { .. } => ErrorKind::Ambiguous,
            Self::CheckFailed { .. } => ErrorKind::CheckFailed,
            Self::Io(_) => ErrorKind::Io,
            Self::Model { .. } => ErrorKind::Model,
            Self::Keyword { source, .. } => source.kind(),
        }
    }

    /// Check the classification
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}
