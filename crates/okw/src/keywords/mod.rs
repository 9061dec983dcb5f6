//! Keyword surface.
//!
//! [`Keywords`] owns one [`Session`] plus the registries, the variable store
//! and the model loader. Every keyword is a method; [`Keywords::run`] reaches
//! the same methods by keyword name for a test runner.
//!
//! ```rust,ignore
//! let mut kw = Keywords::new().with_hosts(HostRegistry::new().with("WebAdapter", web));
//! kw.start_host("Chrome")?;
//! kw.start_app("apps/Demo")?;
//! kw.select_window("Login")?;
//! kw.set_value("Username", "admin")?;
//! kw.verify_value("Username", "admin", MatchMode::Exact)?;
//! ```
//!
//! Failures are wrapped with the keyword name so they render as
//! `[VerifyValue] ...`.

mod app;
mod dispatch;
mod host;
mod list;
mod params;
mod table;
mod text;
mod widget;

pub use dispatch::normalize_keyword;
pub use text::Property;

use crate::adapter::{Adapter, Capability, HostRegistry};
use crate::config::{VerifyFamily, Variables};
use crate::matcher::{MatchMode, Pattern};
use crate::model::{AppModel, ModelLoader};
use crate::poll::{try_poll_until, PollSpec};
use crate::result::{OkwError, OkwResult};
use crate::resolve::resolve_widget;
use crate::session::{Session, SessionDescription};
use crate::tokens::YesNo;
use crate::widget::{Widget, WidgetRegistry};
use tracing::{debug, info, warn};

/// Keyword library bound to one session
#[derive(Debug, Default)]
pub struct Keywords {
    session: Session,
    widgets: WidgetRegistry,
    hosts: HostRegistry,
    variables: Variables,
    loader: ModelLoader,
}

impl Keywords {
    /// Library with the built-in widgets and no adapters
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the widget registry
    #[must_use]
    pub fn with_widgets(mut self, widgets: WidgetRegistry) -> Self {
        self.widgets = widgets;
        self
    }

    /// Replace the host registry
    #[must_use]
    pub fn with_hosts(mut self, hosts: HostRegistry) -> Self {
        self.hosts = hosts;
        self
    }

    /// Replace the variable store
    #[must_use]
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    /// Replace the model loader
    #[must_use]
    pub fn with_loader(mut self, loader: ModelLoader) -> Self {
        self.loader = loader;
        self
    }

    /// The session
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable session, for runners that manage lifecycle themselves
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Runner variables
    pub const fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Mutable runner variables
    pub fn variables_mut(&mut self) -> &mut Variables {
        &mut self.variables
    }

    /// Widget registry, for registering custom widget types
    pub fn widgets_mut(&mut self) -> &mut WidgetRegistry {
        &mut self.widgets
    }

    /// Host registry, for registering adapters
    pub fn hosts_mut(&mut self) -> &mut HostRegistry {
        &mut self.hosts
    }

    /// Start a host from an already built adapter
    pub fn start_host_with(&mut self, adapter: impl Adapter + 'static) {
        self.session.start_host(Box::new(adapter));
    }

    /// Start an app from an in-memory model
    pub fn start_app_with(&mut self, name: &str, model: AppModel) -> OkwResult<()> {
        keyword("StartApp", || Ok(self.session.start_app(name, model)?))
    }

    /// Diagnostic snapshot of the session
    pub fn describe(&self) -> SessionDescription {
        self.session.describe()
    }

    // ---- shared plumbing ----

    fn widget(&self, name: &str) -> OkwResult<Box<dyn Widget + '_>> {
        resolve_widget(&self.session, &self.widgets, name)
    }

    /// Whether a keyword argument says "skip"; logs the skip
    fn skip(&self, keyword: &str, name: &str, value: &str) -> bool {
        let skip = self
            .variables
            .tokens()
            .should_ignore(value, self.variables.ignore_empty());
        if skip {
            info!(keyword, widget = name, "ignored (blank or ignore token)");
        }
        skip
    }

    /// Poll a text getter until it matches `expected` under `mode`
    fn verify_text<F>(
        &self,
        family: VerifyFamily,
        name: &str,
        expected: &str,
        mode: MatchMode,
        mut get: F,
    ) -> OkwResult<()>
    where
        F: FnMut() -> OkwResult<String>,
    {
        let pattern = Pattern::compile(expected, mode)?;
        poll_check(self.variables.poll_spec(family), || {
            let actual = get()?;
            Ok((!pattern.is_match(&actual)).then(|| {
                OkwError::timeout(
                    format!("'{name}': {}", mode.describe_mismatch(&actual, expected)),
                    expected,
                    actual,
                    Some(mode),
                )
            }))
        })
    }

    /// Poll a YES/NO state of widget `name`
    fn verify_state(
        &self,
        check: StateCheck,
        name: &str,
        expected: &str,
        probe: fn(&dyn Widget) -> OkwResult<bool>,
    ) -> OkwResult<()> {
        let w = self.widget(name)?;
        let want = YesNo::parse(expected)?.as_bool();
        if let Some(capability) = check.capability {
            require_capability(w.as_ref(), capability)?;
        }
        poll_check(self.variables.poll_spec(check.family), || {
            let observed = probe(w.as_ref())?;
            Ok((observed != want).then(|| {
                OkwError::timeout(
                    check.failure(name, want),
                    YesNo::from(want).as_str(),
                    YesNo::from(observed).as_str(),
                    None,
                )
            }))
        })
    }
}

/// Run a keyword body, attributing failures to `name`
fn keyword<T>(name: &str, body: impl FnOnce() -> OkwResult<T>) -> OkwResult<T> {
    debug!(keyword = name, "running keyword");
    body().map_err(|err| err.in_keyword(name))
}

/// Poll `check` until it reports no failure; the last failure is returned
///
/// `check` yields `Ok(None)` on success and `Ok(Some(err))` describing the
/// current mismatch. Errors returned by `check` itself stop polling at once.
fn poll_check<F>(spec: PollSpec, check: F) -> OkwResult<()>
where
    F: FnMut() -> OkwResult<Option<OkwError>>,
{
    match try_poll_until(spec, check, Option::is_none)? {
        None => Ok(()),
        Some(failure) => Err(failure),
    }
}

/// Read a getter, turning failures into `""`
fn degrade(keyword: &str, name: &str, value: OkwResult<String>) -> String {
    value.unwrap_or_else(|err| {
        warn!(keyword, widget = name, error = %err, "getter failed, using empty text");
        String::new()
    })
}

/// Fail unless the widget's adapter offers `capability`
fn require_capability(w: &dyn Widget, capability: Capability) -> OkwResult<()> {
    let ctx = w.context();
    if ctx.adapter.supports(capability) {
        return Ok(());
    }
    Err(OkwError::not_supported(format!(
        "Not implemented by adapter: method '{}' is missing on '{}' \
         for widget '{}' ({}), locator={}",
        capability.method_name(),
        ctx.adapter.name(),
        ctx.name,
        ctx.kind,
        ctx.locator_text()
    )))
}

/// Wording and timing of one YES/NO verification
#[derive(Debug, Clone, Copy)]
struct StateCheck {
    family: VerifyFamily,
    capability: Option<Capability>,
    /// e.g. `be visible`
    phrase: &'static str,
    /// `is` or `does`
    aux: &'static str,
}

impl StateCheck {
    const fn new(
        family: VerifyFamily,
        capability: Option<Capability>,
        phrase: &'static str,
        aux: &'static str,
    ) -> Self {
        Self {
            family,
            capability,
            phrase,
            aux,
        }
    }

    fn failure(self, name: &str, want: bool) -> String {
        if want {
            format!("Element '{name}' should {}, but it {} not.", self.phrase, self.aux)
        } else {
            format!("Element '{name}' should NOT {}, but it {}.", self.phrase, self.aux)
        }
    }
}
