//! Runtime context: the host → app → window state machine.
//!
//! A [`Session`] owns the active adapter, the active application with its
//! locator model, and the selected window. The ordering
//! `window ⇒ app ⇒ adapter` always holds; lookups that would break it fail
//! with a distinct [`ContextError`].

use crate::adapter::Adapter;
use crate::model::{AppModel, WindowModel};
use crate::result::ErrorKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Lifecycle violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// `StopHost` without a host
    #[error("No host is active")]
    NotActive,

    /// App started before any host
    #[error("Cannot start app '{app}': no active host")]
    NoActiveHost {
        /// Requested app
        app: String,
    },

    /// App or window operation without an app
    #[error("No active app")]
    NoActiveApp,

    /// Window missing from the app model
    #[error("Window '{window}' not found in app '{app}'")]
    WindowNotFound {
        /// Requested window
        window: String,
        /// Active app
        app: String,
    },

    /// Widget lookup without a host
    #[error("No adapter: start a host first")]
    NoAdapter,

    /// Widget lookup without an app
    #[error("No app: start an app first")]
    NoApp,

    /// Widget lookup without a window
    #[error("No window: select a window first")]
    NoWindow,

    /// `SelectApp` named a different app
    #[error("App '{requested}' is not active (active app: '{active}')")]
    AppMismatch {
        /// Requested app
        requested: String,
        /// Active app
        active: String,
    },

    /// `SelectHost` named a different adapter
    #[error("Host '{requested}' is not active (active host: '{active}')")]
    HostMismatch {
        /// Requested host
        requested: String,
        /// Active adapter name
        active: String,
    },
}

impl ContextError {
    /// Error classification
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::WindowNotFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::PreconditionViolation,
        }
    }
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Nothing started
    NoHost,
    /// Adapter running
    HostActive,
    /// App model loaded
    AppActive,
    /// Window selected, widgets resolvable
    WindowSelected,
}

/// Diagnostic snapshot of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    /// Session id
    pub id: Uuid,
    /// Lifecycle state
    pub state: SessionState,
    /// Active adapter name
    pub adapter: Option<String>,
    /// Active app
    pub app: Option<String>,
    /// Selected window
    pub window: Option<String>,
}

/// Active application
#[derive(Debug)]
pub struct ActiveApp {
    /// App name, a root key of its model
    pub name: String,
    /// Windows of the app
    pub model: AppModel,
}

/// Runtime context for one test session
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    adapter: Option<Box<dyn Adapter>>,
    app: Option<ActiveApp>,
    window: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an empty session
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            adapter: None,
            app: None,
            window: None,
        }
    }

    /// Session id for log correlation
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        match (&self.adapter, &self.app, &self.window) {
            (None, _, _) => SessionState::NoHost,
            (Some(_), None, _) => SessionState::HostActive,
            (Some(_), Some(_), None) => SessionState::AppActive,
            (Some(_), Some(_), Some(_)) => SessionState::WindowSelected,
        }
    }

    /// Install an adapter, replacing any previous host and dropping app and window
    pub fn start_host(&mut self, adapter: Box<dyn Adapter>) {
        info!(session = %self.id, adapter = adapter.name(), "host started");
        self.adapter = Some(adapter);
        self.app = None;
        self.window = None;
    }

    /// Drop the adapter
    pub fn stop_host(&mut self) -> Result<(), ContextError> {
        let adapter = self.adapter.take().ok_or(ContextError::NotActive)?;
        info!(session = %self.id, adapter = adapter.name(), "host stopped");
        self.app = None;
        self.window = None;
        Ok(())
    }

    /// Activate an app; needs a host
    pub fn start_app(&mut self, name: &str, model: AppModel) -> Result<(), ContextError> {
        if self.adapter.is_none() {
            return Err(ContextError::NoActiveHost {
                app: name.to_string(),
            });
        }
        info!(session = %self.id, app = name, "app started");
        self.app = Some(ActiveApp {
            name: name.to_string(),
            model,
        });
        self.window = None;
        Ok(())
    }

    /// Re-select the active app by name, clearing the window
    pub fn select_app(&mut self, name: &str) -> Result<(), ContextError> {
        let app = self.app.as_ref().ok_or(ContextError::NoActiveApp)?;
        if app.name != name {
            return Err(ContextError::AppMismatch {
                requested: name.to_string(),
                active: app.name.clone(),
            });
        }
        info!(session = %self.id, app = name, "app selected");
        self.window = None;
        Ok(())
    }

    /// Deactivate the app
    pub fn stop_app(&mut self) -> Result<(), ContextError> {
        let app = self.app.take().ok_or(ContextError::NoActiveApp)?;
        info!(session = %self.id, app = %app.name, "app stopped");
        self.window = None;
        Ok(())
    }

    /// Select a window of the active app
    pub fn select_window(&mut self, name: &str) -> Result<(), ContextError> {
        let app = self.app.as_ref().ok_or(ContextError::NoActiveApp)?;
        if app.model.window(name).is_none() {
            return Err(ContextError::WindowNotFound {
                window: name.to_string(),
                app: app.name.clone(),
            });
        }
        info!(session = %self.id, app = %app.name, window = name, "window selected");
        self.window = Some(name.to_string());
        Ok(())
    }

    /// Active adapter
    pub fn adapter(&self) -> Result<&dyn Adapter, ContextError> {
        self.adapter.as_deref().ok_or(ContextError::NoAdapter)
    }

    /// Active app
    pub fn app(&self) -> Option<&ActiveApp> {
        self.app.as_ref()
    }

    /// Selected window name
    pub fn window(&self) -> Option<&str> {
        self.window.as_deref()
    }

    /// Model of the selected window, checking adapter, app and window in order
    pub fn current_window_model(&self) -> Result<&WindowModel, ContextError> {
        self.adapter()?;
        let app = self.app.as_ref().ok_or(ContextError::NoApp)?;
        let window = self.window.as_deref().ok_or(ContextError::NoWindow)?;
        app.model
            .window(window)
            .ok_or_else(|| ContextError::WindowNotFound {
                window: window.to_string(),
                app: app.name.clone(),
            })
    }

    /// Diagnostic snapshot
    pub fn describe(&self) -> SessionDescription {
        SessionDescription {
            id: self.id,
            state: self.state(),
            adapter: self.adapter.as_ref().map(|a| a.name().to_string()),
            app: self.app.as_ref().map(|a| a.name.clone()),
            window: self.window.clone(),
        }
    }
}
