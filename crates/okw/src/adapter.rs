//! Driver adapter contract.
//!
//! An [`Adapter`] talks to one UI technology (browser, desktop RPC, ...).
//! Every operation has a default body returning [`OkwError::NotSupported`],
//! so a driver only implements what it can do and reports the rest through
//! [`Adapter::supports`].

use crate::model::{HostDefinition, Locator};
use crate::result::{OkwError, OkwResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Capabilities
// =============================================================================

/// One adapter operation, queried through [`Adapter::supports`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    /// `element_exists`
    ElementExists,
    /// `is_visible`
    Visible,
    /// `is_enabled`
    Enabled,
    /// `is_editable`
    Editable,
    /// `is_focusable`
    Focusable,
    /// `is_clickable`
    Clickable,
    /// `has_focus`
    HasFocus,
    /// `focus`
    Focus,
    /// `get_text`
    GetText,
    /// `get_value`
    GetValue,
    /// `get_attribute`
    GetAttribute,
    /// `input_text`
    InputText,
    /// `clear_text`
    ClearText,
    /// `click`
    Click,
    /// `double_click`
    DoubleClick,
    /// `press_keys`
    PressKeys,
    /// `select_by_label`
    SelectByLabel,
    /// `unselect_all`
    UnselectAll,
    /// `selected_labels`
    SelectedLabels,
    /// `option_count`
    OptionCount,
    /// `select_radio`
    SelectRadio,
    /// `read_table`
    ReadTable,
    /// `scroll_into_view`
    ScrollIntoView,
    /// `execute_script`
    ExecuteScript,
}

impl Capability {
    /// Every capability
    pub const ALL: [Self; 24] = [
        Self::ElementExists,
        Self::Visible,
        Self::Enabled,
        Self::Editable,
        Self::Focusable,
        Self::Clickable,
        Self::HasFocus,
        Self::Focus,
        Self::GetText,
        Self::GetValue,
        Self::GetAttribute,
        Self::InputText,
        Self::ClearText,
        Self::Click,
        Self::DoubleClick,
        Self::PressKeys,
        Self::SelectByLabel,
        Self::UnselectAll,
        Self::SelectedLabels,
        Self::OptionCount,
        Self::SelectRadio,
        Self::ReadTable,
        Self::ScrollIntoView,
        Self::ExecuteScript,
    ];

    /// Adapter method name
    pub const fn method_name(self) -> &'static str {
        match self {
            Self::ElementExists => "element_exists",
            Self::Visible => "is_visible",
            Self::Enabled => "is_enabled",
            Self::Editable => "is_editable",
            Self::Focusable => "is_focusable",
            Self::Clickable => "is_clickable",
            Self::HasFocus => "has_focus",
            Self::Focus => "focus",
            Self::GetText => "get_text",
            Self::GetValue => "get_value",
            Self::GetAttribute => "get_attribute",
            Self::InputText => "input_text",
            Self::ClearText => "clear_text",
            Self::Click => "click",
            Self::DoubleClick => "double_click",
            Self::PressKeys => "press_keys",
            Self::SelectByLabel => "select_by_label",
            Self::UnselectAll => "unselect_all",
            Self::SelectedLabels => "selected_labels",
            Self::OptionCount => "option_count",
            Self::SelectRadio => "select_radio",
            Self::ReadTable => "read_table",
            Self::ScrollIntoView => "scroll_into_view",
            Self::ExecuteScript => "execute_script",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Error for an operation the adapter does not implement
pub fn unsupported(adapter: &str, capability: Capability) -> OkwError {
    OkwError::not_supported(format!(
        "Adapter '{adapter}' does not support '{}'",
        capability.method_name()
    ))
}

// =============================================================================
// Table snapshot
// =============================================================================

/// Header row plus data rows as read from the UI
///
/// Indices are 1-based; row 0 is the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    /// Header cells
    pub headers: Vec<String>,
    /// Data rows
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    /// Create a table snapshot
    pub fn new<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Cells of a row; out of range is empty
    pub fn row(&self, row: usize) -> Vec<String> {
        match row {
            0 => self.headers.clone(),
            n => self.rows.get(n - 1).cloned().unwrap_or_default(),
        }
    }

    /// One cell; out of range is `""`
    pub fn cell(&self, row: usize, col: usize) -> String {
        if col == 0 {
            return String::new();
        }
        let cells = match row {
            0 => Some(&self.headers),
            n => self.rows.get(n - 1),
        };
        cells
            .and_then(|cells| cells.get(col - 1))
            .cloned()
            .unwrap_or_default()
    }

    /// A column across all data rows, short rows padded with `""`
    pub fn column(&self, col: usize) -> Vec<String> {
        (1..=self.rows.len()).map(|row| self.cell(row, col)).collect()
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Header count, or the widest data row when there are no headers
    pub fn column_count(&self) -> usize {
        if self.headers.is_empty() {
            self.rows.iter().map(Vec::len).max().unwrap_or(0)
        } else {
            self.headers.len()
        }
    }
}

// =============================================================================
// Adapter
// =============================================================================

/// Driver for one UI technology
///
/// Operations take `&self`; drivers keep mutable session state behind
/// interior mutability.
pub trait Adapter: fmt::Debug {
    /// Adapter name, compared by `SelectHost`
    fn name(&self) -> &str;

    /// Whether the operation for `capability` is implemented
    fn supports(&self, capability: Capability) -> bool;

    /// Whether the element is present
    fn element_exists(&self, locator: &Locator) -> OkwResult<bool> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::ElementExists))
    }

    /// Whether the element is displayed
    fn is_visible(&self, locator: &Locator) -> OkwResult<bool> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::Visible))
    }

    /// Whether the element accepts interaction
    fn is_enabled(&self, locator: &Locator) -> OkwResult<bool> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::Enabled))
    }

    /// Whether the element accepts text input
    fn is_editable(&self, locator: &Locator) -> OkwResult<bool> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::Editable))
    }

    /// Whether the element can take focus
    fn is_focusable(&self, locator: &Locator) -> OkwResult<bool> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::Focusable))
    }

    /// Whether a click would reach the element
    fn is_clickable(&self, locator: &Locator) -> OkwResult<bool> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::Clickable))
    }

    /// Whether the element has keyboard focus
    fn has_focus(&self, locator: &Locator) -> OkwResult<bool> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::HasFocus))
    }

    /// Move keyboard focus to the element
    fn focus(&self, locator: &Locator) -> OkwResult<()> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::Focus))
    }

    /// Visible text
    fn get_text(&self, locator: &Locator) -> OkwResult<String> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::GetText))
    }

    /// Input value
    fn get_value(&self, locator: &Locator) -> OkwResult<String> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::GetValue))
    }

    /// Attribute value, `None` when absent
    fn get_attribute(&self, locator: &Locator, name: &str) -> OkwResult<Option<String>> {
        let _ = (locator, name);
        Err(unsupported(self.name(), Capability::GetAttribute))
    }

    /// Type text into the element
    fn input_text(&self, locator: &Locator, text: &str) -> OkwResult<()> {
        let _ = (locator, text);
        Err(unsupported(self.name(), Capability::InputText))
    }

    /// Clear the element's text
    fn clear_text(&self, locator: &Locator) -> OkwResult<()> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::ClearText))
    }

    /// Single click
    fn click(&self, locator: &Locator) -> OkwResult<()> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::Click))
    }

    /// Double click
    fn double_click(&self, locator: &Locator) -> OkwResult<()> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::DoubleClick))
    }

    /// Send keys, e.g. `ENTER` or `CTRL+A`
    fn press_keys(&self, locator: &Locator, keys: &str) -> OkwResult<()> {
        let _ = (locator, keys);
        Err(unsupported(self.name(), Capability::PressKeys))
    }

    /// Select a list entry by its label
    fn select_by_label(&self, locator: &Locator, label: &str) -> OkwResult<()> {
        let _ = (locator, label);
        Err(unsupported(self.name(), Capability::SelectByLabel))
    }

    /// Clear a multi-selection
    fn unselect_all(&self, locator: &Locator) -> OkwResult<()> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::UnselectAll))
    }

    /// Labels of the selected entries
    fn selected_labels(&self, locator: &Locator) -> OkwResult<Vec<String>> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::SelectedLabels))
    }

    /// Number of entries
    fn option_count(&self, locator: &Locator) -> OkwResult<usize> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::OptionCount))
    }

    /// Select the radio button with `value` in a group
    fn select_radio(&self, group: &Locator, value: &str) -> OkwResult<()> {
        let _ = (group, value);
        Err(unsupported(self.name(), Capability::SelectRadio))
    }

    /// Snapshot of a table
    fn read_table(&self, locator: &Locator) -> OkwResult<TableData> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::ReadTable))
    }

    /// Scroll the element into view
    fn scroll_into_view(&self, locator: &Locator) -> OkwResult<()> {
        let _ = locator;
        Err(unsupported(self.name(), Capability::ScrollIntoView))
    }

    /// Run a script in the driver and return its result
    fn execute_script(&self, script: &str) -> OkwResult<serde_json::Value> {
        let _ = script;
        Err(unsupported(self.name(), Capability::ExecuteScript))
    }
}

// =============================================================================
// Host registry
// =============================================================================

/// Builds an adapter from a host definition
pub type AdapterFactory = fn(&HostDefinition) -> OkwResult<Box<dyn Adapter>>;

/// Adapter type tag to factory
#[derive(Clone, Default)]
pub struct HostRegistry {
    factories: BTreeMap<String, AdapterFactory>,
}

impl fmt::Debug for HostRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostRegistry")
            .field("tags", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl HostRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory
    pub fn register(&mut self, tag: impl Into<String>, factory: AdapterFactory) {
        self.factories.insert(tag.into(), factory);
    }

    /// Builder form of [`HostRegistry::register`]
    #[must_use]
    pub fn with(mut self, tag: impl Into<String>, factory: AdapterFactory) -> Self {
        self.register(tag, factory);
        self
    }

    /// Look up a tag; dotted paths fall back to their last segment
    pub fn get(&self, tag: &str) -> Option<AdapterFactory> {
        lookup(&self.factories, tag).copied()
    }

    /// Build the adapter for `definition`
    pub fn create(&self, definition: &HostDefinition) -> OkwResult<Box<dyn Adapter>> {
        let factory = self.get(&definition.class).ok_or_else(|| {
            OkwError::not_found(format!(
                "No adapter registered for class '{}'",
                definition.class
            ))
        })?;
        factory(definition)
    }

    /// Registered tags
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

/// Exact tag first, then the last `.`-separated segment
pub(crate) fn lookup<'m, V>(map: &'m BTreeMap<String, V>, tag: &str) -> Option<&'m V> {
    map.get(tag).or_else(|| {
        tag.rsplit_once('.')
            .and_then(|(_, last)| map.get(last))
    })
}
