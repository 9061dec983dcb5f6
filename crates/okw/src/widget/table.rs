//! Table widget over adapter snapshots.

use super::{Widget, WidgetContext};
use crate::adapter::TableData;
use crate::result::{OkwError, OkwResult};

/// Grid of cells with an optional header row
///
/// Every call reads a fresh [`TableData`] snapshot so polling sees UI
/// updates. The model option `row_key_column` overrides the 1-based key
/// column used by the by-header keywords.
#[derive(Debug)]
pub struct Table<'a> {
    ctx: WidgetContext<'a>,
}

impl<'a> Table<'a> {
    /// Bind to a context
    pub fn new(ctx: WidgetContext<'a>) -> Self {
        Self { ctx }
    }

    fn snapshot(&self) -> OkwResult<TableData> {
        self.ctx.adapter.read_table(self.ctx.locator()?)
    }
}

impl Widget for Table<'_> {
    fn context(&self) -> &WidgetContext<'_> {
        &self.ctx
    }

    fn click(&self) -> OkwResult<()> {
        self.ctx.adapter.click(self.ctx.locator()?)
    }

    fn row_texts(&self, row: usize) -> OkwResult<Vec<String>> {
        Ok(self.snapshot()?.row(row))
    }

    fn column_texts(&self, col: usize) -> OkwResult<Vec<String>> {
        Ok(self.snapshot()?.column(col))
    }

    fn cell_text(&self, row: usize, col: usize) -> OkwResult<String> {
        Ok(self.snapshot()?.cell(row, col))
    }

    fn row_count(&self) -> OkwResult<usize> {
        Ok(self.snapshot()?.row_count())
    }

    fn column_count(&self) -> OkwResult<usize> {
        Ok(self.snapshot()?.column_count())
    }

    fn header_names(&self) -> OkwResult<Vec<String>> {
        Ok(self.snapshot()?.headers)
    }

    fn row_key_column_index(&self) -> OkwResult<usize> {
        match self.ctx.option_str("row_key_column") {
            None => Ok(1),
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(index) if index >= 1 => Ok(index),
                _ => Err(OkwError::invalid_argument(format!(
                    "Table '{}': row_key_column must be a positive integer, got '{raw}'",
                    self.ctx.name
                ))),
            },
        }
    }
}

/// Factory for [`Table`]
pub fn table<'a>(ctx: WidgetContext<'a>) -> Box<dyn Widget + 'a> {
    Box::new(Table::new(ctx))
}
