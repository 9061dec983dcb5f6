//! Built-in widget types delegating to the adapter.

use super::{Widget, WidgetContext};
use crate::adapter::Capability;
use crate::model::Locator;
use crate::result::{OkwError, OkwResult};
use std::collections::BTreeMap;

/// Single-line or multi-line text input
#[derive(Debug)]
pub struct TextField<'a> {
    ctx: WidgetContext<'a>,
}

impl<'a> TextField<'a> {
    /// Bind to a context
    pub fn new(ctx: WidgetContext<'a>) -> Self {
        Self { ctx }
    }
}

impl Widget for TextField<'_> {
    fn context(&self) -> &WidgetContext<'_> {
        &self.ctx
    }

    fn click(&self) -> OkwResult<()> {
        self.ctx.adapter.click(self.ctx.locator()?)
    }

    fn set_value(&self, value: &str) -> OkwResult<()> {
        let locator = self.ctx.locator()?;
        self.ctx.adapter.clear_text(locator)?;
        if value.is_empty() {
            return Ok(());
        }
        self.ctx.adapter.input_text(locator, value)
    }

    fn type_key(&self, keys: &str) -> OkwResult<()> {
        self.ctx.adapter.press_keys(self.ctx.locator()?, keys)
    }

    fn value(&self) -> OkwResult<String> {
        self.ctx.adapter.get_value(self.ctx.locator()?)
    }
}

/// Push button
#[derive(Debug)]
pub struct Button<'a> {
    ctx: WidgetContext<'a>,
}

impl<'a> Button<'a> {
    /// Bind to a context
    pub fn new(ctx: WidgetContext<'a>) -> Self {
        Self { ctx }
    }
}

impl Widget for Button<'_> {
    fn context(&self) -> &WidgetContext<'_> {
        &self.ctx
    }

    fn click(&self) -> OkwResult<()> {
        self.ctx.adapter.click(self.ctx.locator()?)
    }

    fn double_click(&self) -> OkwResult<()> {
        self.ctx.adapter.double_click(self.ctx.locator()?)
    }

    fn value(&self) -> OkwResult<String> {
        self.text()
    }
}

/// Read-only text
#[derive(Debug)]
pub struct Text<'a> {
    ctx: WidgetContext<'a>,
}

impl<'a> Text<'a> {
    /// Bind to a context
    pub fn new(ctx: WidgetContext<'a>) -> Self {
        Self { ctx }
    }
}

impl Widget for Text<'_> {
    fn context(&self) -> &WidgetContext<'_> {
        &self.ctx
    }

    fn value(&self) -> OkwResult<String> {
        self.text()
    }
}

/// Drop-down with optional free text entry
///
/// The model option `editable` wins over the adapter's `is_editable`.
/// Editable combos are cleared, typed into and confirmed with ENTER;
/// the others select by label.
#[derive(Debug)]
pub struct ComboBox<'a> {
    ctx: WidgetContext<'a>,
}

impl<'a> ComboBox<'a> {
    /// Bind to a context
    pub fn new(ctx: WidgetContext<'a>) -> Self {
        Self { ctx }
    }

    fn editable(&self) -> OkwResult<bool> {
        if let Some(editable) = self.ctx.option_bool("editable") {
            return Ok(editable);
        }
        if self.ctx.adapter.supports(Capability::Editable) {
            self.ctx.adapter.is_editable(self.ctx.locator()?)
        } else {
            Ok(false)
        }
    }
}

impl Widget for ComboBox<'_> {
    fn context(&self) -> &WidgetContext<'_> {
        &self.ctx
    }

    fn click(&self) -> OkwResult<()> {
        self.ctx.adapter.click(self.ctx.locator()?)
    }

    fn set_value(&self, value: &str) -> OkwResult<()> {
        let locator = self.ctx.locator()?;
        if self.editable()? {
            self.ctx.adapter.clear_text(locator)?;
            self.ctx.adapter.input_text(locator, value)?;
            self.ctx.adapter.press_keys(locator, "ENTER")
        } else {
            self.ctx.adapter.select_by_label(locator, value)
        }
    }

    fn select(&self, value: &str) -> OkwResult<()> {
        self.ctx.adapter.select_by_label(self.ctx.locator()?, value)
    }

    fn type_key(&self, keys: &str) -> OkwResult<()> {
        self.ctx.adapter.press_keys(self.ctx.locator()?, keys)
    }

    fn value(&self) -> OkwResult<String> {
        let locator = self.ctx.locator()?;
        if self.editable()? {
            self.ctx.adapter.get_value(locator)
        } else {
            Ok(self
                .ctx
                .adapter
                .selected_labels(locator)?
                .into_iter()
                .next()
                .unwrap_or_default())
        }
    }

    fn list_count(&self) -> OkwResult<usize> {
        self.ctx.adapter.option_count(self.ctx.locator()?)
    }

    fn selected_count(&self) -> OkwResult<usize> {
        Ok(self.ctx.adapter.selected_labels(self.ctx.locator()?)?.len())
    }
}

/// Multi-select list
///
/// `select` takes comma-separated labels; an empty selection clears it.
#[derive(Debug)]
pub struct ListBox<'a> {
    ctx: WidgetContext<'a>,
}

impl<'a> ListBox<'a> {
    /// Bind to a context
    pub fn new(ctx: WidgetContext<'a>) -> Self {
        Self { ctx }
    }
}

impl Widget for ListBox<'_> {
    fn context(&self) -> &WidgetContext<'_> {
        &self.ctx
    }

    fn select(&self, value: &str) -> OkwResult<()> {
        let locator = self.ctx.locator()?;
        let labels: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .collect();
        if labels.is_empty() {
            return self.ctx.adapter.unselect_all(locator);
        }
        for label in labels {
            self.ctx.adapter.select_by_label(locator, label)?;
        }
        Ok(())
    }

    fn set_value(&self, value: &str) -> OkwResult<()> {
        let locator = self.ctx.locator()?;
        self.ctx.adapter.unselect_all(locator)?;
        self.select(value)
    }

    fn value(&self) -> OkwResult<String> {
        Ok(self
            .ctx
            .adapter
            .selected_labels(self.ctx.locator()?)?
            .join(", "))
    }

    fn list_count(&self) -> OkwResult<usize> {
        self.ctx.adapter.option_count(self.ctx.locator()?)
    }

    fn selected_count(&self) -> OkwResult<usize> {
        Ok(self.ctx.adapter.selected_labels(self.ctx.locator()?)?.len())
    }
}

/// Radio button group
///
/// The group is the `group` model option, or the declared locator.
#[derive(Debug)]
pub struct RadioList<'a> {
    ctx: WidgetContext<'a>,
}

impl<'a> RadioList<'a> {
    /// Bind to a context
    pub fn new(ctx: WidgetContext<'a>) -> Self {
        Self { ctx }
    }

    fn group(&self) -> OkwResult<Locator> {
        if let Some(group) = self.ctx.option_str("group") {
            return Ok(Locator::Structured(BTreeMap::from([(
                "group".to_string(),
                group,
            )])));
        }
        self.ctx.locator.clone().ok_or_else(|| {
            OkwError::invalid_argument(format!(
                "RadioList '{}' needs either a 'group' option or a locator",
                self.ctx.name
            ))
        })
    }
}

impl Widget for RadioList<'_> {
    fn context(&self) -> &WidgetContext<'_> {
        &self.ctx
    }

    fn select(&self, value: &str) -> OkwResult<()> {
        self.ctx.adapter.select_radio(&self.group()?, value)
    }

    fn set_value(&self, value: &str) -> OkwResult<()> {
        self.select(value)
    }

    fn value(&self) -> OkwResult<String> {
        Ok(self
            .ctx
            .adapter
            .selected_labels(&self.group()?)?
            .into_iter()
            .next()
            .unwrap_or_default())
    }

    fn list_count(&self) -> OkwResult<usize> {
        self.ctx.adapter.option_count(&self.group()?)
    }

    fn selected_count(&self) -> OkwResult<usize> {
        Ok(self.ctx.adapter.selected_labels(&self.group()?)?.len())
    }
}

/// Factory for [`TextField`]
pub fn text_field<'a>(ctx: WidgetContext<'a>) -> Box<dyn Widget + 'a> {
    Box::new(TextField::new(ctx))
}

/// Factory for [`Button`]
pub fn button<'a>(ctx: WidgetContext<'a>) -> Box<dyn Widget + 'a> {
    Box::new(Button::new(ctx))
}

/// Factory for [`Text`]
pub fn text<'a>(ctx: WidgetContext<'a>) -> Box<dyn Widget + 'a> {
    Box::new(Text::new(ctx))
}

/// Factory for [`ComboBox`]
pub fn combo_box<'a>(ctx: WidgetContext<'a>) -> Box<dyn Widget + 'a> {
    Box::new(ComboBox::new(ctx))
}

/// Factory for [`ListBox`]
pub fn list_box<'a>(ctx: WidgetContext<'a>) -> Box<dyn Widget + 'a> {
    Box::new(ListBox::new(ctx))
}

/// Factory for [`RadioList`]
pub fn radio_list<'a>(ctx: WidgetContext<'a>) -> Box<dyn Widget + 'a> {
    Box::new(RadioList::new(ctx))
}
