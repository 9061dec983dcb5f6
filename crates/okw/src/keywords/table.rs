//! Table verification keywords.
//!
//! Cells are matched with full-string wildcards (`*`, `?`, dot matches
//! newline) unless the keyword is a REGX variant. Row and column indices
//! are 1-based; row 0 is the header row. Patterns are split with the
//! configured [`Tokens`](crate::tokens::Tokens), so `$TAB` separates cells
//! and `$LF` rows by default.
//!
//! Every keyword polls with the table timeout and reports the mismatch of
//! its last observation.

use super::list::parse_count;
use super::{keyword, poll_check, Keywords};
use crate::config::VerifyFamily;
use crate::matcher::{MatchMode, Pattern};
use crate::result::{OkwError, OkwResult};
use crate::widget::Widget;

// =============================================================================
// Pattern helpers
// =============================================================================

fn wcm(expected: &str) -> OkwResult<Pattern> {
    Pattern::compile(expected, MatchMode::Wildcard)
}

fn wcm_all(expected: &[String]) -> OkwResult<Vec<Pattern>> {
    expected.iter().map(|e| wcm(e)).collect()
}

/// `None` means the cell must be empty
fn regex_all(expected: &[String]) -> OkwResult<Vec<Option<Pattern>>> {
    expected
        .iter()
        .map(|e| {
            if e.is_empty() {
                Ok(None)
            } else {
                Pattern::regex_dotall(e).map(Some)
            }
        })
        .collect()
}

fn parse_index(what: &str, value: &str) -> OkwResult<usize> {
    value.trim().parse().map_err(|_| {
        OkwError::invalid_argument(format!("{what} index must be integer, got '{value}'"))
    })
}

/// First difference between observed cells and wildcard patterns
///
/// `whole` names the sequence (`Row`, `Column`), `item` its entries.
fn wcm_mismatch(
    actual: &[String],
    expected: &[Pattern],
    whole: &str,
    item: &str,
) -> Option<String> {
    if actual.len() != expected.len() {
        return Some(format!(
            "{whole} length mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        ));
    }
    actual
        .iter()
        .zip(expected)
        .enumerate()
        .find(|(_, (a, e))| !e.is_match(a))
        .map(|(i, (a, e))| {
            format!(
                "{item} {} mismatch: expected '{}', got '{a}'",
                i + 1,
                e.expected()
            )
        })
}

fn regex_mismatch(
    actual: &[String],
    expected: &[Option<Pattern>],
    whole: &str,
    item: &str,
) -> Option<String> {
    if actual.len() != expected.len() {
        return Some(format!(
            "{whole} length mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        ));
    }
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        let n = i + 1;
        match e {
            None if !a.is_empty() => return Some(format!("{item} {n} expected empty, got '{a}'")),
            Some(p) if !p.is_match(a) => {
                return Some(format!(
                    "{item} {n} does not match regex: '{}', got '{a}'",
                    p.expected()
                ))
            }
            _ => {}
        }
    }
    None
}

fn table_mismatch(actual: &[Vec<String>], expected: &[Vec<Pattern>]) -> Option<String> {
    if actual.len() != expected.len() {
        return Some(format!(
            "Row count mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        ));
    }
    for (i, (act, exp)) in actual.iter().zip(expected).enumerate() {
        let r = i + 1;
        if act.len() != exp.len() {
            return Some(format!(
                "Row {r} length mismatch: expected {}, got {}",
                exp.len(),
                act.len()
            ));
        }
        for (j, (a, e)) in act.iter().zip(exp).enumerate() {
            if !e.is_match(a) {
                return Some(format!(
                    "Mismatch at r{r}c{}: expected '{}', got '{a}'",
                    j + 1,
                    e.expected()
                ));
            }
        }
    }
    None
}

fn failure(detail: String, expected: &str, last: String, mode: MatchMode) -> OkwError {
    OkwError::timeout(detail, expected, last, Some(mode))
}

// =============================================================================
// Table reads
// =============================================================================

fn all_rows(w: &dyn Widget) -> OkwResult<Vec<Vec<String>>> {
    (1..=w.row_count()?).map(|r| w.row_texts(r)).collect()
}

/// 1-based index of the header equal to `header`
fn header_index(w: &dyn Widget, header: &str) -> OkwResult<usize> {
    w.header_names()?
        .iter()
        .position(|h| h == header)
        .map(|i| i + 1)
        .ok_or_else(|| OkwError::not_found(format!("Column header not found: '{header}'")))
}

/// Rows whose cell in `key_col` matches `key`
fn rows_matching(w: &dyn Widget, key_col: usize, key: &Pattern) -> OkwResult<Vec<usize>> {
    let mut rows = Vec::new();
    for r in 1..=w.row_count()? {
        if key.is_match(&w.cell_text(r, key_col)?) {
            rows.push(r);
        }
    }
    Ok(rows)
}

/// The single row matching a key, or the failure to report
enum KeyedRow {
    Found(usize),
    Failed(OkwError),
}

fn keyed_row(
    w: &dyn Widget,
    key_col: usize,
    key: &Pattern,
    describe: impl Fn() -> String,
) -> OkwResult<KeyedRow> {
    let rows = rows_matching(w, key_col, key)?;
    Ok(match rows.as_slice() {
        [row] => KeyedRow::Found(*row),
        [] => KeyedRow::Failed(OkwError::not_found(format!("No row matched {}", describe()))),
        many => KeyedRow::Failed(OkwError::ambiguous(format!(
            "Row not unique for {}: matched {} rows",
            describe(),
            many.len()
        ))),
    })
}

// =============================================================================
// Keywords
// =============================================================================

impl Keywords {
    /// `VerifyTableRowContent name row pattern`
    pub fn verify_table_row_content(&self, name: &str, row: &str, pattern: &str) -> OkwResult<()> {
        keyword("VerifyTableRowContent", || {
            let row = parse_index("Row", row)?;
            let expected = wcm_all(&self.variables.tokens().parse_row_pattern(pattern))?;
            let w = self.widget(name)?;
            poll_check(self.variables.poll_spec(VerifyFamily::Table), || {
                let actual = w.row_texts(row)?;
                Ok(wcm_mismatch(&actual, &expected, "Row", "Cell")
                    .map(|d| failure(d, pattern, actual.join(" | "), MatchMode::Wildcard)))
            })
        })
    }

    /// `VerifyTableColumnContent name col pattern`
    pub fn verify_table_column_content(
        &self,
        name: &str,
        col: &str,
        pattern: &str,
    ) -> OkwResult<()> {
        keyword("VerifyTableColumnContent", || {
            let col = parse_index("Column", col)?;
            let expected = wcm_all(&self.variables.tokens().parse_column_pattern(pattern))?;
            let w = self.widget(name)?;
            poll_check(self.variables.poll_spec(VerifyFamily::Table), || {
                let actual = w.column_texts(col)?;
                Ok(wcm_mismatch(&actual, &expected, "Column", "Row")
                    .map(|d| failure(d, pattern, actual.join(" | "), MatchMode::Wildcard)))
            })
        })
    }

    /// `VerifyTableCellValue name row col expected`
    pub fn verify_table_cell_value(
        &self,
        name: &str,
        row: &str,
        col: &str,
        expected: &str,
    ) -> OkwResult<()> {
        keyword("VerifyTableCellValue", || {
            let (row, col) = (parse_index("Row", row)?, parse_index("Column", col)?);
            let expected = if self.variables.tokens().is_empty_cell(expected) {
                ""
            } else {
                expected
            };
            let pattern = wcm(expected)?;
            let w = self.widget(name)?;
            poll_check(self.variables.poll_spec(VerifyFamily::Table), || {
                let actual = w.cell_text(row, col)?;
                Ok((!pattern.is_match(&actual)).then(|| {
                    failure(
                        format!("Expected '{expected}', got '{actual}' at r{row}c{col}"),
                        expected,
                        actual,
                        MatchMode::Wildcard,
                    )
                }))
            })
        })
    }

    /// `VerifyTableRowCount name count`
    pub fn verify_table_row_count(&self, name: &str, expected: &str) -> OkwResult<()> {
        keyword("VerifyTableRowCount", || {
            self.verify_table_count(name, expected, "rows", |w| w.row_count())
        })
    }

    /// `VerifyTableColumnCount name count`
    pub fn verify_table_column_count(&self, name: &str, expected: &str) -> OkwResult<()> {
        keyword("VerifyTableColumnCount", || {
            self.verify_table_count(name, expected, "columns", |w| w.column_count())
        })
    }

    fn verify_table_count(
        &self,
        name: &str,
        expected: &str,
        unit: &str,
        count: fn(&dyn Widget) -> OkwResult<usize>,
    ) -> OkwResult<()> {
        let want = parse_count(expected)?;
        let w = self.widget(name)?;
        poll_check(self.variables.poll_spec(VerifyFamily::Table), || {
            let got = count(w.as_ref())?;
            Ok((got != want).then(|| {
                OkwError::timeout(
                    format!("Expected {want} {unit}, got {got}"),
                    want.to_string(),
                    got.to_string(),
                    None,
                )
            }))
        })
    }

    /// `VerifyTableHasRow name pattern`: some data row matches the pattern
    pub fn verify_table_has_row(&self, name: &str, pattern: &str) -> OkwResult<()> {
        keyword("VerifyTableHasRow", || {
            let expected = wcm_all(&self.variables.tokens().parse_row_pattern(pattern))?;
            let w = self.widget(name)?;
            poll_check(self.variables.poll_spec(VerifyFamily::Table), || {
                let rows = all_rows(w.as_ref())?;
                let found = rows
                    .iter()
                    .any(|row| wcm_mismatch(row, &expected, "Row", "Cell").is_none());
                Ok((!found).then(|| {
                    failure(
                        "No row matched the expected pattern".to_string(),
                        pattern,
                        format!("{} rows", rows.len()),
                        MatchMode::Wildcard,
                    )
                }))
            })
        })
    }

    /// `VerifyTableContent name pattern`: all data rows, in order
    pub fn verify_table_content(&self, name: &str, pattern: &str) -> OkwResult<()> {
        keyword("VerifyTableContent", || {
            let expected = self
                .variables
                .tokens()
                .parse_table_pattern(pattern)
                .iter()
                .map(|row| wcm_all(row))
                .collect::<OkwResult<Vec<_>>>()?;
            let w = self.widget(name)?;
            poll_check(self.variables.poll_spec(VerifyFamily::Table), || {
                let actual = all_rows(w.as_ref())?;
                Ok(table_mismatch(&actual, &expected).map(|d| {
                    failure(d, pattern, format!("{} rows", actual.len()), MatchMode::Wildcard)
                }))
            })
        })
    }

    /// `VerifyTableCellValueByHeaders name rowKey colHeader expected`
    ///
    /// The row is found by matching `row_key` against the key column; the
    /// column by exact header text.
    pub fn verify_table_cell_value_by_headers(
        &self,
        name: &str,
        row_key: &str,
        col_header: &str,
        expected: &str,
    ) -> OkwResult<()> {
        keyword("VerifyTableCellValueByHeaders", || {
            let w = self.widget(name)?;
            let col = header_index(w.as_ref(), col_header)?;
            let key_col = w.row_key_column_index()?;
            let key = wcm(row_key)?;
            let expected = if self.variables.tokens().is_empty_cell(expected) {
                ""
            } else {
                expected
            };
            let pattern = wcm(expected)?;
            poll_check(self.variables.poll_spec(VerifyFamily::Table), || {
                let row = match keyed_row(w.as_ref(), key_col, &key, || {
                    format!("key pattern '{row_key}'")
                })? {
                    KeyedRow::Found(row) => row,
                    KeyedRow::Failed(err) => return Ok(Some(err)),
                };
                let actual = w.cell_text(row, col)?;
                Ok((!pattern.is_match(&actual)).then(|| {
                    failure(
                        format!(
                            "Expected '{expected}', got '{actual}' at row key '{row_key}', col '{col_header}'"
                        ),
                        expected,
                        actual,
                        MatchMode::Wildcard,
                    )
                }))
            })
        })
    }

    /// `VerifyTableCellValueByHeadersREGX name rowKey colHeader regex`
    ///
    /// The empty token or an empty pattern requires an empty cell.
    pub fn verify_table_cell_value_by_headers_regx(
        &self,
        name: &str,
        row_key: &str,
        col_header: &str,
        expected: &str,
    ) -> OkwResult<()> {
        keyword("VerifyTableCellValueByHeadersREGX", || {
            let w = self.widget(name)?;
            let col = header_index(w.as_ref(), col_header)?;
            let key_col = w.row_key_column_index()?;
            let key = wcm(row_key)?;
            let want_empty =
                expected.is_empty() || self.variables.tokens().is_empty_cell(expected);
            let pattern = if want_empty {
                None
            } else {
                Some(Pattern::regex_dotall(expected)?)
            };
            poll_check(self.variables.poll_spec(VerifyFamily::Table), || {
                let row = match keyed_row(w.as_ref(), key_col, &key, || {
                    format!("key pattern '{row_key}'")
                })? {
                    KeyedRow::Found(row) => row,
                    KeyedRow::Failed(err) => return Ok(Some(err)),
                };
                let actual = w.cell_text(row, col)?;
                let ok = pattern.as_ref().map_or(actual.is_empty(), |p| p.is_match(&actual));
                Ok((!ok).then(|| {
                    failure(
                        format!(
                            "Regex '{expected}' did not match value '{actual}' at row key '{row_key}', col '{col_header}'"
                        ),
                        expected,
                        actual,
                        MatchMode::Regex,
                    )
                }))
            })
        })
    }

    /// `VerifyTableRowContentByHeader name header value pattern`
    ///
    /// The row is the one whose cell under `header` matches `value`.
    pub fn verify_table_row_content_by_header(
        &self,
        name: &str,
        header: &str,
        value: &str,
        pattern: &str,
    ) -> OkwResult<()> {
        keyword("VerifyTableRowContentByHeader", || {
            let w = self.widget(name)?;
            let key_col = header_index(w.as_ref(), header)?;
            let key = wcm(value)?;
            let expected = wcm_all(&self.variables.tokens().parse_row_pattern(pattern))?;
            poll_check(self.variables.poll_spec(VerifyFamily::Table), || {
                let row = match keyed_row(w.as_ref(), key_col, &key, || {
                    format!("pattern '{value}' in column '{header}'")
                })? {
                    KeyedRow::Found(row) => row,
                    KeyedRow::Failed(err) => return Ok(Some(err)),
                };
                let actual = w.row_texts(row)?;
                Ok(wcm_mismatch(&actual, &expected, "Row", "Cell")
                    .map(|d| failure(d, pattern, actual.join(" | "), MatchMode::Wildcard)))
            })
        })
    }

    /// `VerifyTableRowContentByHeaderREGX name header value pattern`
    pub fn verify_table_row_content_by_header_regx(
        &self,
        name: &str,
        header: &str,
        value: &str,
        pattern: &str,
    ) -> OkwResult<()> {
        keyword("VerifyTableRowContentByHeaderREGX", || {
            let w = self.widget(name)?;
            let key_col = header_index(w.as_ref(), header)?;
            let key = wcm(value)?;
            let expected = regex_all(&self.variables.tokens().parse_row_pattern(pattern))?;
            poll_check(self.variables.poll_spec(VerifyFamily::Table), || {
                let row = match keyed_row(w.as_ref(), key_col, &key, || {
                    format!("pattern '{value}' in column '{header}'")
                })? {
                    KeyedRow::Found(row) => row,
                    KeyedRow::Failed(err) => return Ok(Some(err)),
                };
                let actual = w.row_texts(row)?;
                Ok(regex_mismatch(&actual, &expected, "Row", "Cell")
                    .map(|d| failure(d, pattern, actual.join(" | "), MatchMode::Regex)))
            })
        })
    }

    /// `VerifyTableColumnContentByHeader name header pattern`
    pub fn verify_table_column_content_by_header(
        &self,
        name: &str,
        header: &str,
        pattern: &str,
    ) -> OkwResult<()> {
        keyword("VerifyTableColumnContentByHeader", || {
            let w = self.widget(name)?;
            let col = header_index(w.as_ref(), header)?;
            let expected = wcm_all(&self.variables.tokens().parse_column_pattern(pattern))?;
            poll_check(self.variables.poll_spec(VerifyFamily::Table), || {
                let actual = w.column_texts(col)?;
                Ok(wcm_mismatch(&actual, &expected, "Column", "Row")
                    .map(|d| failure(d, pattern, actual.join(" | "), MatchMode::Wildcard)))
            })
        })
    }

    /// `VerifyTableColumnContentByHeaderREGX name header pattern`
    pub fn verify_table_column_content_by_header_regx(
        &self,
        name: &str,
        header: &str,
        pattern: &str,
    ) -> OkwResult<()> {
        keyword("VerifyTableColumnContentByHeaderREGX", || {
            let w = self.widget(name)?;
            let col = header_index(w.as_ref(), header)?;
            let expected = regex_all(&self.variables.tokens().parse_column_pattern(pattern))?;
            poll_check(self.variables.poll_spec(VerifyFamily::Table), || {
                let actual = w.column_texts(col)?;
                Ok(regex_mismatch(&actual, &expected, "Column", "Row")
                    .map(|d| failure(d, pattern, actual.join(" | "), MatchMode::Regex)))
            })
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::adapter::TableData;
    use crate::keywords::fixture::keywords;
    use crate::mock::MockAdapter;
    use crate::model::WindowModel;
    use crate::result::ErrorKind;

    fn items() -> (Keywords, MockAdapter) {
        let (kw, mock) = keywords(WindowModel::new().with_widget("Items", "Table", "id=items"));
        mock.element("id=items").table(TableData::new(
            ["ID", "Name", "Price"],
            vec![
                vec!["1", "Foo", "9.99"],
                vec!["2", "Bar", ""],
                vec!["3", "Foo Bar", "1.50"],
            ],
        ));
        (kw, mock)
    }

    mod positional_tests {
        use super::*;

        #[test]
        fn test_row_content() {
            let (kw, _) = items();
            kw.verify_table_row_content("Items", "1", "1$TABFoo$TAB9.*").unwrap();
            kw.verify_table_row_content("Items", "2", "2$TABBar$TAB$EMPTY").unwrap();
            kw.verify_table_row_content("Items", "0", "ID$TABName$TABPrice").unwrap();
        }

        #[test]
        fn test_row_cell_mismatch_names_cell() {
            let (kw, _) = items();
            let err = kw
                .verify_table_row_content("Items", "1", "1$TABBar$TAB*")
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Timeout);
            assert_eq!(
                err.to_string(),
                "[VerifyTableRowContent] Cell 2 mismatch: expected 'Bar', got 'Foo'"
            );
        }

        #[test]
        fn test_row_length_mismatch() {
            let (kw, _) = items();
            let err = kw.verify_table_row_content("Items", "1", "1$TABFoo").unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableRowContent] Row length mismatch: expected 2, got 3"
            );
        }

        #[test]
        fn test_escaped_separator_is_literal() {
            let (kw, mock) = items();
            mock.element("id=items").table(TableData::new(
                ["A"],
                vec![vec!["x$TABy"]],
            ));
            kw.verify_table_row_content("Items", "1", "x\\$TABy").unwrap();
        }

        #[test]
        fn test_column_content() {
            let (kw, _) = items();
            kw.verify_table_column_content("Items", "2", "Foo$LFBar$LFFoo*").unwrap();
            let err = kw
                .verify_table_column_content("Items", "1", "1$LF2$LF4")
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableColumnContent] Row 3 mismatch: expected '4', got '3'"
            );
        }

        #[test]
        fn test_empty_column_token() {
            let (kw, mock) = items();
            mock.element("id=items")
                .table(TableData::new(["A"], Vec::<Vec<String>>::new()));
            kw.verify_table_column_content("Items", "1", "$EMPTYCOL").unwrap();
            kw.verify_table_content("Items", "$EMPTYTABLE").unwrap();
        }

        #[test]
        fn test_cell_value() {
            let (kw, _) = items();
            kw.verify_table_cell_value("Items", "1", "3", "9.99").unwrap();
            kw.verify_table_cell_value("Items", "2", "3", "$EMPTY").unwrap();
            kw.verify_table_cell_value("Items", "9", "9", "").unwrap();
            let err = kw.verify_table_cell_value("Items", "1", "2", "Bar").unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableCellValue] Expected 'Bar', got 'Foo' at r1c2"
            );
        }

        #[test]
        fn test_bad_index() {
            let (kw, _) = items();
            let err = kw.verify_table_cell_value("Items", "x", "1", "a").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }

    mod shape_tests {
        use super::*;

        #[test]
        fn test_counts() {
            let (kw, _) = items();
            kw.verify_table_row_count("Items", "3").unwrap();
            kw.verify_table_column_count("Items", "3").unwrap();
            let err = kw.verify_table_row_count("Items", "4").unwrap_err();
            assert_eq!(err.to_string(), "[VerifyTableRowCount] Expected 4 rows, got 3");
            let err = kw.verify_table_column_count("Items", "2").unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableColumnCount] Expected 2 columns, got 3"
            );
            let err = kw.verify_table_row_count("Items", "many").unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableRowCount] Expected must be integer, got 'many'"
            );
        }

        #[test]
        fn test_has_row() {
            let (kw, _) = items();
            kw.verify_table_has_row("Items", "2$TABBar$TAB$EMPTY").unwrap();
            kw.verify_table_has_row("Items", "*$TABFoo B?r$TAB*").unwrap();
            let err = kw.verify_table_has_row("Items", "4$TAB*$TAB*").unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableHasRow] No row matched the expected pattern"
            );
        }

        #[test]
        fn test_content() {
            let (kw, _) = items();
            kw.verify_table_content("Items", "1$TABFoo$TAB*$LF2$TABBar$TAB$LF3$TAB*$TAB1.50")
                .unwrap();
            let err = kw
                .verify_table_content("Items", "1$TABFoo$TAB*$LF2$TABBaz$TAB")
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableContent] Row count mismatch: expected 2, got 3"
            );
            let err = kw
                .verify_table_content("Items", "1$TABFoo$TAB*$LF2$TABBaz$TAB$LF3$TAB*$TAB*")
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableContent] Mismatch at r2c2: expected 'Baz', got 'Bar'"
            );
            let err = kw
                .verify_table_content("Items", "1$TABFoo$LF2$TABBar$TAB$LF3$TAB*$TAB*")
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableContent] Row 1 length mismatch: expected 2, got 3"
            );
        }

        #[test]
        fn test_rows_arrive_while_polling() {
            let (kw, mock) = items();
            let err = kw.verify_table_row_count("Items", "0").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Timeout);
            mock.element("id=items")
                .table(TableData::new(["ID"], Vec::<Vec<String>>::new()));
            kw.verify_table_row_count("Items", "0").unwrap();
        }
    }

    mod header_tests {
        use super::*;

        #[test]
        fn test_cell_by_headers() {
            let (kw, _) = items();
            kw.verify_table_cell_value_by_headers("Items", "2", "Name", "Bar").unwrap();
            kw.verify_table_cell_value_by_headers("Items", "2", "Price", "$EMPTY").unwrap();
            let err = kw
                .verify_table_cell_value_by_headers("Items", "1", "Price", "1.00")
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Timeout);
            assert_eq!(
                err.to_string(),
                "[VerifyTableCellValueByHeaders] Expected '1.00', got '9.99' at row key '1', col 'Price'"
            );
        }

        #[test]
        fn test_header_not_found() {
            let (kw, mock) = items();
            let err = kw
                .verify_table_cell_value_by_headers("Items", "1", "Qty", "1")
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
            assert_eq!(
                err.to_string(),
                "[VerifyTableCellValueByHeaders] Column header not found: 'Qty'"
            );
            assert_eq!(mock.call_count("read_table"), 1);
        }

        #[test]
        fn test_key_not_found_or_ambiguous() {
            let (kw, _) = items();
            let err = kw
                .verify_table_cell_value_by_headers("Items", "7", "Name", "*")
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
            assert_eq!(
                err.to_string(),
                "[VerifyTableCellValueByHeaders] No row matched key pattern '7'"
            );
            let err = kw
                .verify_table_cell_value_by_headers("Items", "*", "Name", "*")
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Ambiguous);
            assert_eq!(
                err.to_string(),
                "[VerifyTableCellValueByHeaders] Row not unique for key pattern '*': matched 3 rows"
            );
        }

        #[test]
        fn test_row_key_column_option() {
            let (kw, mock) = keywords(WindowModel::new().with_entry(
                "Items",
                serde_yaml_ng::from_str("{class: Table, locator: id=items, row_key_column: 2}")
                    .unwrap(),
            ));
            mock.element("id=items").table(TableData::new(
                ["ID", "Name"],
                vec![vec!["1", "Foo"], vec!["2", "Bar"]],
            ));
            kw.verify_table_cell_value_by_headers("Items", "Bar", "ID", "2").unwrap();
        }

        #[test]
        fn test_row_content_by_header() {
            let (kw, _) = items();
            kw.verify_table_row_content_by_header("Items", "Name", "Bar", "2$TABBar$TAB")
                .unwrap();
            let err = kw
                .verify_table_row_content_by_header("Items", "Name", "Foo*", "*$TAB*$TAB*")
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableRowContentByHeader] Row not unique for pattern 'Foo*' in column 'Name': matched 2 rows"
            );
            let err = kw
                .verify_table_row_content_by_header("Items", "Name", "Baz", "*")
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableRowContentByHeader] No row matched pattern 'Baz' in column 'Name'"
            );
        }

        #[test]
        fn test_column_content_by_header() {
            let (kw, _) = items();
            kw.verify_table_column_content_by_header("Items", "Price", "9.99$LF$EMPTY$LF1.*")
                .unwrap();
            let err = kw
                .verify_table_column_content_by_header("Items", "Price", "9.99")
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableColumnContentByHeader] Column length mismatch: expected 1, got 3"
            );
        }
    }

    mod regex_tests {
        use super::*;

        #[test]
        fn test_cell_by_headers_regx() {
            let (kw, _) = items();
            kw.verify_table_cell_value_by_headers_regx("Items", "1", "Price", r"^\d+\.\d{2}$")
                .unwrap();
            kw.verify_table_cell_value_by_headers_regx("Items", "2", "Price", "").unwrap();
            kw.verify_table_cell_value_by_headers_regx("Items", "2", "Price", "$EMPTY")
                .unwrap();
            let err = kw
                .verify_table_cell_value_by_headers_regx("Items", "1", "Name", "^Bar")
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableCellValueByHeadersREGX] Regex '^Bar' did not match value 'Foo' at row key '1', col 'Name'"
            );
        }

        #[test]
        fn test_invalid_regex_fails_fast() {
            let (kw, mock) = items();
            let err = kw
                .verify_table_column_content_by_header_regx("Items", "Name", "Foo$LF(")
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            assert_eq!(mock.call_count("read_table"), 1);
        }

        #[test]
        fn test_row_content_by_header_regx() {
            let (kw, _) = items();
            kw.verify_table_row_content_by_header_regx("Items", "ID", "2", "^2$$TABB.r$TAB")
                .unwrap();
            let err = kw
                .verify_table_row_content_by_header_regx("Items", "ID", "2", "2$TABBar$TAB.+")
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableRowContentByHeaderREGX] Cell 3 does not match regex: '.+', got ''"
            );
            let err = kw
                .verify_table_row_content_by_header_regx("Items", "ID", "1", "1$TAB$EMPTY$TAB.*")
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableRowContentByHeaderREGX] Cell 2 expected empty, got 'Foo'"
            );
        }

        #[test]
        fn test_column_content_by_header_regx() {
            let (kw, _) = items();
            kw.verify_table_column_content_by_header_regx("Items", "Name", "Foo$LFBar$LF Bar$")
                .unwrap();
            let err = kw
                .verify_table_column_content_by_header_regx("Items", "ID", "1$LF2$LF[45]")
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "[VerifyTableColumnContentByHeaderREGX] Row 3 does not match regex: '[45]', got '3'"
            );
        }

        #[test]
        fn test_dot_matches_newline() {
            let (kw, mock) = items();
            mock.element("id=items").table(TableData::new(
                ["Note"],
                vec![vec!["line one\nline two"]],
            ));
            kw.verify_table_column_content_by_header_regx("Items", "Note", "one.line").unwrap();
            kw.verify_table_column_content_by_header("Items", "Note", "line*two").unwrap();
        }
    }
}
