//! Locator model: application, window and widget definitions.
//!
//! A model file is a YAML mapping `app -> window -> widget -> definition`.
//! A host model carries the adapter description under the reserved
//! `__self__` key:
//!
//! ```yaml
//! Chrome:
//!   __self__:
//!     class: WebAdapter
//!     browser: chrome
//! ```
//!
//! Widget definitions:
//!
//! ```yaml
//! LoginDialog:
//!   Username: { class: TextField, locator: "id=user" }
//!   Submit:   { class: Button, locator: { css: "button[type=submit]" } }
//! ```

use crate::result::{OkwError, OkwResult};
use serde_yaml_ng::{Mapping, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reserved key holding host/adapter settings
pub const SELF_KEY: &str = "__self__";

/// Default model search directory
pub const DEFAULT_MODEL_DIR: &str = "locators";

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// =============================================================================
// Locator
// =============================================================================

/// Adapter-specific element address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// A single selector string, e.g. `id=user`
    Text(String),
    /// Strategy to selector, e.g. `{css: "#user"}`
    Structured(BTreeMap<String, String>),
}

impl Locator {
    /// Build from a YAML value
    pub fn from_value(value: &Value) -> OkwResult<Self> {
        match value {
            Value::Mapping(map) => {
                let mut parts = BTreeMap::new();
                for (key, val) in map {
                    let (Some(key), Some(val)) = (scalar(key), scalar(val)) else {
                        return Err(OkwError::invalid_argument(
                            "locator mapping entries must be scalars",
                        ));
                    };
                    parts.insert(key, val);
                }
                Ok(Self::Structured(parts))
            }
            other => scalar(other)
                .map(Self::Text)
                .ok_or_else(|| OkwError::invalid_argument("locator must be a string or mapping")),
        }
    }

    /// The selector text of a plain locator
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Structured(_) => None,
        }
    }

    /// A strategy entry of a structured locator
    pub fn get(&self, strategy: &str) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Structured(map) => map.get(strategy).map(String::as_str),
        }
    }
}

impl From<&str> for Locator {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Structured(map) => {
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                Ok(())
            }
        }
    }
}

// =============================================================================
// Widget definitions
// =============================================================================

/// One widget entry of a window model
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetDefinition {
    /// Widget type tag, dotted paths allowed
    pub class: String,
    /// Element address
    pub locator: Option<Locator>,
    /// Remaining keys, passed to the widget
    pub options: BTreeMap<String, Value>,
}

impl WidgetDefinition {
    /// Parse the entry for widget `name`
    pub fn from_value(name: &str, value: &Value) -> OkwResult<Self> {
        let Value::Mapping(map) = value else {
            return Err(OkwError::invalid_argument(format!(
                "Widget '{name}' definition must be a mapping"
            )));
        };
        let mut class = None;
        let mut locator = None;
        let mut options = BTreeMap::new();
        for (key, val) in map {
            let Some(key) = key.as_str() else { continue };
            match key {
                "class" => class = val.as_str().map(str::to_string),
                "locator" if !val.is_null() => locator = Some(Locator::from_value(val)?),
                "locator" => {}
                other => {
                    options.insert(other.to_string(), val.clone());
                }
            }
        }
        let class = class.ok_or_else(|| {
            OkwError::invalid_argument(format!("Widget '{name}' has no valid 'class' entry"))
        })?;
        Ok(Self {
            class,
            locator,
            options,
        })
    }

    /// Option as text
    pub fn option_str(&self, key: &str) -> Option<String> {
        self.options.get(key).and_then(scalar)
    }

    /// Option as boolean; accepts YAML booleans and yes/true/1 strings
    pub fn option_bool(&self, key: &str) -> Option<bool> {
        option_bool(&self.options, key)
    }
}

pub(crate) fn option_bool(options: &BTreeMap<String, Value>, key: &str) -> Option<bool> {
    match options.get(key)? {
        Value::Bool(b) => Some(*b),
        other => scalar(other).map(|s| {
            matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "yes" | "true" | "1" | "on"
            )
        }),
    }
}

// =============================================================================
// Window and application models
// =============================================================================

/// Widgets of one window, parsed lazily per lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowModel {
    widgets: BTreeMap<String, Value>,
}

impl WindowModel {
    /// Create an empty window model
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a YAML mapping; null is an empty window
    pub fn from_value(window: &str, value: &Value) -> OkwResult<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Mapping(map) => Ok(Self {
                widgets: map
                    .iter()
                    .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), v.clone())))
                    .collect(),
            }),
            _ => Err(OkwError::model(format!(
                "window '{window}' must be a mapping of widgets"
            ))),
        }
    }

    /// Add a widget with a plain locator
    #[must_use]
    pub fn with_widget(self, name: &str, class: &str, locator: &str) -> Self {
        let mut entry = Mapping::new();
        entry.insert(Value::from("class"), Value::from(class));
        entry.insert(Value::from("locator"), Value::from(locator));
        self.with_entry(name, Value::Mapping(entry))
    }

    /// Add a raw widget entry
    #[must_use]
    pub fn with_entry(mut self, name: &str, entry: Value) -> Self {
        self.widgets.insert(name.to_string(), entry);
        self
    }

    /// Whether a widget of that name exists
    pub fn contains(&self, name: &str) -> bool {
        self.widgets.contains_key(name)
    }

    /// Parsed definition, `None` when absent
    pub fn widget(&self, name: &str) -> OkwResult<Option<WidgetDefinition>> {
        self.widgets
            .get(name)
            .map(|value| WidgetDefinition::from_value(name, value))
            .transpose()
    }

    /// Widget names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.widgets.keys().map(String::as_str)
    }
}

/// Windows of one application
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppModel {
    windows: BTreeMap<String, WindowModel>,
}

impl AppModel {
    /// Create an empty application model
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the YAML value under the app key; `__self__` is skipped
    pub fn from_value(value: &Value) -> OkwResult<Self> {
        let map = match value {
            Value::Mapping(map) => map,
            Value::Null => return Ok(Self::new()),
            _ => return Err(OkwError::model("application model must be a mapping")),
        };
        let mut windows = BTreeMap::new();
        for (key, val) in map {
            let Some(name) = key.as_str() else { continue };
            if name == SELF_KEY {
                continue;
            }
            windows.insert(name.to_string(), WindowModel::from_value(name, val)?);
        }
        Ok(Self { windows })
    }

    /// Add a window
    #[must_use]
    pub fn with_window(mut self, name: &str, window: WindowModel) -> Self {
        self.windows.insert(name.to_string(), window);
        self
    }

    /// Look up a window
    pub fn window(&self, name: &str) -> Option<&WindowModel> {
        self.windows.get(name)
    }

    /// Window names in order
    pub fn window_names(&self) -> impl Iterator<Item = &str> {
        self.windows.keys().map(String::as_str)
    }
}

// =============================================================================
// Host definitions
// =============================================================================

/// Adapter description read from `<name>.__self__`
#[derive(Debug, Clone, PartialEq)]
pub struct HostDefinition {
    /// Host model name
    pub name: String,
    /// Adapter type tag
    pub class: String,
    /// Constructor arguments
    pub args: BTreeMap<String, Value>,
}

impl HostDefinition {
    /// Read the host `name` from a loaded model
    pub fn from_model(root: &Value, name: &str) -> OkwResult<Self> {
        let this = root
            .get(name)
            .and_then(|host| host.get(SELF_KEY))
            .ok_or_else(|| {
                OkwError::not_found(format!("Host '{name}' has no '{SELF_KEY}' entry in model"))
            })?;
        let Value::Mapping(map) = this else {
            return Err(OkwError::model(format!(
                "'{name}.{SELF_KEY}' must be a mapping"
            )));
        };
        let mut class = None;
        let mut args = BTreeMap::new();
        for (key, val) in map {
            let Some(key) = key.as_str() else { continue };
            if key == "class" {
                class = val.as_str().map(str::to_string);
            } else {
                args.insert(key.to_string(), val.clone());
            }
        }
        let class = class.ok_or_else(|| {
            OkwError::invalid_argument(format!("Host '{name}' has no valid 'class' entry"))
        })?;
        Ok(Self {
            name: name.to_string(),
            class,
            args,
        })
    }

    /// Argument as text
    pub fn arg_str(&self, key: &str) -> Option<String> {
        self.args.get(key).and_then(scalar)
    }

    /// Argument as boolean
    pub fn arg_bool(&self, key: &str) -> Option<bool> {
        option_bool(&self.args, key)
    }
}

// =============================================================================
// Loader
// =============================================================================

/// Finds and parses `<name>.yaml` in an ordered list of directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelLoader {
    search_dirs: Vec<PathBuf>,
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self {
            search_dirs: vec![PathBuf::from(DEFAULT_MODEL_DIR)],
        }
    }
}

impl ModelLoader {
    /// Search exactly these directories
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a search directory
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    /// Configured directories
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let file = if Path::new(name).extension().is_some_and(|e| e == "yaml" || e == "yml") {
            name.to_string()
        } else {
            format!("{name}.yaml")
        };
        self.search_dirs.iter().map(|dir| dir.join(&file)).collect()
    }

    /// Path of the first matching file
    pub fn find(&self, name: &str) -> OkwResult<PathBuf> {
        let candidates = self.candidates(name);
        candidates
            .iter()
            .find(|path| path.is_file())
            .cloned()
            .ok_or_else(|| {
                let searched: Vec<String> =
                    candidates.iter().map(|p| p.display().to_string()).collect();
                OkwError::not_found(format!(
                    "Model '{name}' not found (searched: {})",
                    searched.join(", ")
                ))
            })
    }

    /// Load and parse model `name`
    pub fn load(&self, name: &str) -> OkwResult<Value> {
        let path = self.find(name)?;
        debug!(model = name, path = %path.display(), "loading model");
        let text = std::fs::read_to_string(&path)?;
        serde_yaml_ng::from_str(&text)
            .map_err(|e| OkwError::model(format!("failed to parse {}: {e}", path.display())))
    }
}
