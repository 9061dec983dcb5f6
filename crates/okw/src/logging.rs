//! Structured logging setup.
//!
//! Keyword output goes through `tracing`. Hosts that do not install their own
//! subscriber can call [`init_logging`], which writes to stderr and honours
//! the `OKW_LOG` environment variable.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configured filter
pub const LOG_ENV_VAR: &str = "OKW_LOG";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `okw=debug`
    pub filter: String,
    /// Include the event target
    pub with_target: bool,
    /// Emit JSON lines instead of human readable text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            with_target: true,
            json: false,
        }
    }
}

impl LogConfig {
    /// Set the filter directive
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Toggle event targets
    #[must_use]
    pub const fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Toggle JSON output
    #[must_use]
    pub const fn with_json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }
}

fn resolve_filter(config: &LogConfig, env_override: Option<&str>) -> EnvFilter {
    env_override
        .filter(|directive| !directive.trim().is_empty())
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(&config.filter))
}

/// Install a global stderr subscriber
///
/// If a global subscriber is already set the call does nothing, so it is safe
/// to call from every test.
pub fn init_logging(config: &LogConfig) {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let filter = resolve_filter(config, env.as_deref());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(config.with_target)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    // First subscriber wins.
    if config.json {
        let _ = tracing::subscriber::set_global_default(builder.json().finish());
    } else {
        let _ = tracing::subscriber::set_global_default(builder.finish());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_does_not_panic() {
        init_logging(&LogConfig::default());
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        let config = LogConfig::default().with_json(true);
        init_logging(&config);
        init_logging(&config);
    }

    #[test]
    fn test_filter_uses_config() {
        let config = LogConfig::default().with_filter("debug");
        assert_eq!(resolve_filter(&config, None).to_string(), "debug");
    }

    #[test]
    fn test_env_override_wins() {
        let config = LogConfig::default();
        assert_eq!(resolve_filter(&config, Some("warn")).to_string(), "warn");
        assert_eq!(resolve_filter(&config, Some("  ")).to_string(), "info");
    }

    #[test]
    fn test_builders() {
        let config = LogConfig::default().with_target(false).with_json(true);
        assert!(!config.with_target);
        assert!(config.json);
    }
}
