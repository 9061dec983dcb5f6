//! Widget capability contract and type registry.
//!
//! A widget is a short-lived view of one model entry bound to the session's
//! adapter for a single keyword call. Operations a widget type does not
//! offer fail with [`OkwError::NotSupported`]; they never silently do
//! nothing.
//!
//! State checks and attribute getters have default bodies delegating to the
//! adapter. Interaction, value, list and table operations must be provided
//! by the concrete widget.

mod builtin;
mod table;

pub use builtin::{button, combo_box, list_box, radio_list, text, text_field};
pub use builtin::{Button, ComboBox, ListBox, RadioList, Text, TextField};
pub use table::{table, Table};

use crate::adapter::{lookup, Adapter};
use crate::model::{option_bool, Locator};
use crate::result::{OkwError, OkwResult};
use serde_yaml_ng::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Everything a widget needs for one keyword call
#[derive(Debug, Clone)]
pub struct WidgetContext<'a> {
    /// Logical widget name from the model
    pub name: String,
    /// Type tag the widget was built from
    pub kind: String,
    /// Adapter owned by the session
    pub adapter: &'a dyn Adapter,
    /// Declared locator
    pub locator: Option<Locator>,
    /// Extra model keys
    pub options: BTreeMap<String, Value>,
}

impl<'a> WidgetContext<'a> {
    /// Create a context without options
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        adapter: &'a dyn Adapter,
        locator: Option<Locator>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            adapter,
            locator,
            options: BTreeMap::new(),
        }
    }

    /// Attach model options
    #[must_use]
    pub fn with_options(mut self, options: BTreeMap<String, Value>) -> Self {
        self.options = options;
        self
    }

    /// The declared locator, required by every adapter call
    pub fn locator(&self) -> OkwResult<&Locator> {
        self.locator.as_ref().ok_or_else(|| {
            OkwError::invalid_argument(format!(
                "Widget '{}' ({}) has no locator",
                self.name, self.kind
            ))
        })
    }

    /// Error for an operation this widget type does not offer
    pub fn unsupported(&self, operation: &str) -> OkwError {
        OkwError::not_supported(format!(
            "Widget '{}' ({}) does not support '{operation}'",
            self.name, self.kind
        ))
    }

    /// Option as text
    pub fn option_str(&self, key: &str) -> Option<String> {
        match self.options.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Option as boolean
    pub fn option_bool(&self, key: &str) -> Option<bool> {
        option_bool(&self.options, key)
    }

    /// Locator rendered for messages
    pub fn locator_text(&self) -> String {
        self.locator
            .as_ref()
            .map_or_else(|| "<none>".to_string(), ToString::to_string)
    }
}

/// Operations keywords can run against a widget
pub trait Widget: fmt::Debug {
    /// Binding of this widget
    fn context(&self) -> &WidgetContext<'_>;

    // ---- interaction ----

    /// Single click
    fn click(&self) -> OkwResult<()> {
        Err(self.context().unsupported("click"))
    }

    /// Double click
    fn double_click(&self) -> OkwResult<()> {
        Err(self.context().unsupported("double_click"))
    }

    /// Replace the current value
    fn set_value(&self, value: &str) -> OkwResult<()> {
        let _ = value;
        Err(self.context().unsupported("set_value"))
    }

    /// Select an entry
    fn select(&self, value: &str) -> OkwResult<()> {
        let _ = value;
        Err(self.context().unsupported("select"))
    }

    /// Send keys
    fn type_key(&self, keys: &str) -> OkwResult<()> {
        let _ = keys;
        Err(self.context().unsupported("type_key"))
    }

    /// Clear the content
    ///
    /// Uses the adapter's `clear_text`; if that fails, selects all and
    /// presses DELETE.
    fn delete(&self) -> OkwResult<()> {
        let ctx = self.context();
        let locator = ctx.locator()?;
        match ctx.adapter.clear_text(locator) {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!(
                    widget = %ctx.name,
                    error = %err,
                    "clear_text failed, falling back to key presses"
                );
                ctx.adapter.click(locator)?;
                ctx.adapter.press_keys(locator, "CTRL+A")?;
                ctx.adapter.press_keys(locator, "DELETE")
            }
        }
    }

    // ---- getters ----

    /// Current value
    fn value(&self) -> OkwResult<String> {
        Err(self.context().unsupported("value"))
    }

    /// Visible text
    fn text(&self) -> OkwResult<String> {
        let ctx = self.context();
        ctx.adapter.get_text(ctx.locator()?)
    }

    /// Attribute value, `""` when absent
    fn attribute(&self, name: &str) -> OkwResult<String> {
        let ctx = self.context();
        Ok(ctx
            .adapter
            .get_attribute(ctx.locator()?, name)?
            .unwrap_or_default())
    }

    /// `title`, falling back to `aria-label`
    fn tooltip(&self) -> OkwResult<String> {
        let title = self.attribute("title")?;
        if title.is_empty() {
            self.attribute("aria-label")
        } else {
            Ok(title)
        }
    }

    /// `aria-label`, falling back to the visible text
    fn label(&self) -> OkwResult<String> {
        let label = self.attribute("aria-label")?;
        if label.is_empty() {
            self.text()
        } else {
            Ok(label)
        }
    }

    /// `placeholder` attribute
    fn placeholder(&self) -> OkwResult<String> {
        self.attribute("placeholder")
    }

    // ---- state ----

    /// Element present
    fn exists(&self) -> OkwResult<bool> {
        let ctx = self.context();
        ctx.adapter.element_exists(ctx.locator()?)
    }

    /// Element displayed
    fn is_visible(&self) -> OkwResult<bool> {
        let ctx = self.context();
        ctx.adapter.is_visible(ctx.locator()?)
    }

    /// Element enabled
    fn is_enabled(&self) -> OkwResult<bool> {
        let ctx = self.context();
        ctx.adapter.is_enabled(ctx.locator()?)
    }

    /// Element editable
    fn is_editable(&self) -> OkwResult<bool> {
        let ctx = self.context();
        ctx.adapter.is_editable(ctx.locator()?)
    }

    /// Element focused
    fn has_focus(&self) -> OkwResult<bool> {
        let ctx = self.context();
        ctx.adapter.has_focus(ctx.locator()?)
    }

    /// Element focusable
    fn is_focusable(&self) -> OkwResult<bool> {
        let ctx = self.context();
        ctx.adapter.is_focusable(ctx.locator()?)
    }

    /// Element clickable
    fn is_clickable(&self) -> OkwResult<bool> {
        let ctx = self.context();
        ctx.adapter.is_clickable(ctx.locator()?)
    }

    /// Move focus to the element
    fn set_focus(&self) -> OkwResult<()> {
        let ctx = self.context();
        ctx.adapter.focus(ctx.locator()?)
    }

    // ---- lists ----

    /// Number of entries
    fn list_count(&self) -> OkwResult<usize> {
        Err(self.context().unsupported("list_count"))
    }

    /// Number of selected entries
    fn selected_count(&self) -> OkwResult<usize> {
        Err(self.context().unsupported("selected_count"))
    }

    // ---- tables (1-based, row 0 is the header) ----

    /// Cells of a row
    fn row_texts(&self, row: usize) -> OkwResult<Vec<String>> {
        let _ = row;
        Err(self.context().unsupported("row_texts"))
    }

    /// Cells of a column across data rows
    fn column_texts(&self, col: usize) -> OkwResult<Vec<String>> {
        let _ = col;
        Err(self.context().unsupported("column_texts"))
    }

    /// One cell
    fn cell_text(&self, row: usize, col: usize) -> OkwResult<String> {
        let _ = (row, col);
        Err(self.context().unsupported("cell_text"))
    }

    /// Number of data rows
    fn row_count(&self) -> OkwResult<usize> {
        Err(self.context().unsupported("row_count"))
    }

    /// Number of columns
    fn column_count(&self) -> OkwResult<usize> {
        Err(self.context().unsupported("column_count"))
    }

    /// Header cells
    fn header_names(&self) -> OkwResult<Vec<String>> {
        self.row_texts(0)
    }

    /// Column used to find rows by key
    fn row_key_column_index(&self) -> OkwResult<usize> {
        Ok(1)
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Builds a widget bound to a context
pub type WidgetFactory = for<'a> fn(WidgetContext<'a>) -> Box<dyn Widget + 'a>;

/// Widget type tag to factory
#[derive(Clone)]
pub struct WidgetRegistry {
    factories: BTreeMap<String, WidgetFactory>,
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("tags", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl WidgetRegistry {
    /// Registry without any widget types
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry with the built-in widget types
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("TextField", text_field);
        registry.register("Button", button);
        registry.register("Text", text);
        registry.register("ComboBox", combo_box);
        registry.register("ListBox", list_box);
        registry.register("RadioList", radio_list);
        registry.register("Table", table);
        registry
    }

    /// Register or replace a factory
    pub fn register(&mut self, tag: impl Into<String>, factory: WidgetFactory) {
        self.factories.insert(tag.into(), factory);
    }

    /// Builder form of [`WidgetRegistry::register`]
    #[must_use]
    pub fn with(mut self, tag: impl Into<String>, factory: WidgetFactory) -> Self {
        self.register(tag, factory);
        self
    }

    /// Look up a tag; dotted paths fall back to their last segment
    pub fn get(&self, tag: &str) -> Option<WidgetFactory> {
        lookup(&self.factories, tag).copied()
    }

    /// Build a widget for `ctx.kind`
    pub fn build<'a>(&self, ctx: WidgetContext<'a>) -> OkwResult<Box<dyn Widget + 'a>> {
        let factory = self.get(&ctx.kind).ok_or_else(|| {
            OkwError::not_found(format!(
                "Unknown widget class '{}' for widget '{}'",
                ctx.kind, ctx.name
            ))
        })?;
        Ok(factory(ctx))
    }

    /// Registered tags
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::adapter::Capability;
    use crate::mock::MockAdapter;
    use crate::result::ErrorKind;

    #[derive(Debug)]
    struct Plain<'a> {
        ctx: WidgetContext<'a>,
    }

    impl Widget for Plain<'_> {
        fn context(&self) -> &WidgetContext<'_> {
            &self.ctx
        }
    }

    fn plain<'a>(ctx: WidgetContext<'a>) -> Box<dyn Widget + 'a> {
        Box::new(Plain { ctx })
    }

    mod default_tests {
        use super::*;

        #[test]
        fn test_interaction_defaults_not_supported() {
            let mock = MockAdapter::new();
            let w = Plain {
                ctx: WidgetContext::new("X", "Plain", &mock, Some(Locator::from("id=x"))),
            };
            let err = w.click().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotSupported);
            assert_eq!(err.to_string(), "Widget 'X' (Plain) does not support 'click'");
            assert!(w.value().is_err());
            assert!(w.list_count().is_err());
            assert!(w.header_names().is_err());
            assert_eq!(w.row_key_column_index().unwrap(), 1);
        }

        #[test]
        fn test_state_defaults_delegate() {
            let mock = MockAdapter::new();
            mock.element("id=x").visible(false);
            let w = Plain {
                ctx: WidgetContext::new("X", "Plain", &mock, Some(Locator::from("id=x"))),
            };
            assert!(w.exists().unwrap());
            assert!(!w.is_visible().unwrap());
            w.set_focus().unwrap();
            assert!(w.has_focus().unwrap());
        }

        #[test]
        fn test_tooltip_and_label_fallbacks() {
            let mock = MockAdapter::new();
            mock.element("id=x")
                .text("Visible")
                .attribute("aria-label", "Aria");
            let w = Plain {
                ctx: WidgetContext::new("X", "Plain", &mock, Some(Locator::from("id=x"))),
            };
            assert_eq!(w.tooltip().unwrap(), "Aria");
            assert_eq!(w.label().unwrap(), "Aria");
            assert_eq!(w.placeholder().unwrap(), "");

            mock.element("id=y").text("Visible").attribute("title", "Tip");
            let w = Plain {
                ctx: WidgetContext::new("Y", "Plain", &mock, Some(Locator::from("id=y"))),
            };
            assert_eq!(w.tooltip().unwrap(), "Tip");
            assert_eq!(w.label().unwrap(), "Visible");
        }

        #[test]
        fn test_missing_locator() {
            let mock = MockAdapter::new();
            let w = Plain {
                ctx: WidgetContext::new("X", "Plain", &mock, None),
            };
            assert_eq!(w.exists().unwrap_err().kind(), ErrorKind::InvalidArgument);
        }

        #[test]
        fn test_delete_falls_back_to_keys() {
            let mock = MockAdapter::new().without(Capability::ClearText);
            mock.element("id=x").value("old");
            let w = Plain {
                ctx: WidgetContext::new("X", "Plain", &mock, Some(Locator::from("id=x"))),
            };
            w.delete().unwrap();
            assert_eq!(mock.value_of("id=x"), "");
            assert!(mock.was_called("press_keys"));
        }
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn test_builtin_tags() {
            let reg = WidgetRegistry::with_builtin();
            let tags: Vec<_> = reg.tags().collect();
            let builtin = [
                "Button",
                "ComboBox",
                "ListBox",
                "RadioList",
                "Table",
                "Text",
                "TextField",
            ];
            for tag in builtin {
                assert!(tags.contains(&tag), "missing {tag}");
            }
        }

        #[test]
        fn test_dotted_class_fallback() {
            let mock = MockAdapter::new();
            let reg = WidgetRegistry::empty().with("Plain", plain);
            let ctx = WidgetContext::new("X", "my.widgets.Plain", &mock, None);
            let w = reg.build(ctx).unwrap();
            assert_eq!(w.context().kind, "my.widgets.Plain");
        }

        #[test]
        fn test_unknown_class() {
            let mock = MockAdapter::new();
            let ctx = WidgetContext::new("X", "Spinner", &mock, None);
            let err = WidgetRegistry::with_builtin().build(ctx).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
            assert_eq!(err.to_string(), "Unknown widget class 'Spinner' for widget 'X'");
        }
    }
}
