//! OKW: driver-agnostic keyword library for GUI test automation
//!
//! Tests are written as keyword calls against logical names
//! (`SetValue Username admin`). A YAML locator model maps those names to
//! widget types and locators; a pluggable [`Adapter`] performs the actual
//! UI operations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OKW Architecture                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Keywords   │    │ Session    │    │ Widget     │            │
//! │   │ (run by    │───►│ host/app/  │───►│ registry + │            │
//! │   │  name)     │    │ window     │    │ model      │            │
//! │   └────────────┘    └────────────┘    └─────┬──────┘            │
//! │         │                                   │                   │
//! │         ▼                                   ▼                   │
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Variables  │    │ Matcher    │    │ Adapter    │            │
//! │   │ timeouts,  │    │ EXACT/WCM/ │    │ (browser,  │            │
//! │   │ tokens     │    │ REGX       │    │  mock)     │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Verifications poll with per-family timeouts read from [`Variables`].
//!
//! ```rust,ignore
//! use okw::{Keywords, MatchMode, MockAdapter};
//!
//! let mut kw = Keywords::new();
//! kw.start_host_with(MockAdapter::new());
//! kw.start_app("apps/Demo")?;
//! kw.select_window("Login")?;
//! kw.run("SetValue", &["Username", "admin"])?;
//! kw.verify_value("Username", "adm*", MatchMode::Wildcard)?;
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

/// Adapter contract, capabilities and host registry
pub mod adapter;

/// Variable store, timeouts and `SetOKWParameter` names
pub mod config;

/// Keyword surface
pub mod keywords;

/// Subscriber setup for `tracing`
pub mod logging;

/// EXACT, WCM and REGX matching
pub mod matcher;

/// In-memory adapter for tests and dry runs
pub mod mock;

/// Locator models and YAML loading
pub mod model;

/// Deadline polling
pub mod poll;

/// Name to widget resolution
pub mod resolve;

/// Errors
pub mod result;

/// Host, app and window lifecycle
pub mod session;

/// Escaped splitting and sentinel tokens
pub mod tokens;

/// Widget capability contract and type registry
pub mod widget;

pub use adapter::{Adapter, AdapterFactory, Capability, HostRegistry, TableData};
pub use config::{parameter_variable, parse_time, Variables, VerifyFamily};
pub use keywords::{Keywords, Property};
pub use logging::{init_logging, LogConfig};
pub use matcher::{MatchMode, Pattern};
pub use mock::{mock_host, MockAdapter};
pub use model::{AppModel, HostDefinition, Locator, ModelLoader, WidgetDefinition, WindowModel};
pub use poll::{poll_until, poll_until_yes_no, try_poll_until, try_poll_until_yes_no, PollSpec};
pub use resolve::resolve_widget;
pub use result::{ErrorKind, OkwError, OkwResult};
pub use session::{ContextError, Session, SessionDescription, SessionState};
pub use tokens::{Tokens, YesNo};
pub use widget::{Widget, WidgetContext, WidgetFactory, WidgetRegistry};
