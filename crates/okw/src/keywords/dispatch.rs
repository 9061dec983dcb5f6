//! Keyword lookup by name for test runners.
//!
//! Names are folded before lookup, so `Verify Value`, `verify_value` and
//! `VERIFYVALUE` all reach [`Keywords::verify_value`].

use super::{Keywords, Property};
use crate::matcher::MatchMode;
use crate::result::{OkwError, OkwResult};
use tracing::debug;

/// Fold a keyword name: lower case, spaces and underscores removed
pub fn normalize_keyword(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Take exactly `N` arguments
fn arity<'a, const N: usize>(keyword: &str, args: &[&'a str]) -> OkwResult<[&'a str; N]> {
    <[&'a str; N]>::try_from(args).map_err(|_| {
        OkwError::invalid_argument(format!(
            "Keyword '{keyword}' expects {N} argument(s), got {}",
            args.len()
        ))
    })
}

fn done(result: OkwResult<()>) -> OkwResult<Option<String>> {
    result.map(|()| None)
}

fn value(result: OkwResult<String>) -> OkwResult<Option<String>> {
    result.map(Some)
}

/// `caption`, `captionwcm`, `captionregx` and so on
fn split_mode(stem: &str) -> (&str, MatchMode) {
    if let Some(base) = stem.strip_suffix("wcm") {
        (base, MatchMode::Wildcard)
    } else if let Some(base) = stem.strip_suffix("regx") {
        (base, MatchMode::Regex)
    } else {
        (stem, MatchMode::Exact)
    }
}

/// Properties without an extra argument
fn simple_property(stem: &str) -> Option<Property<'static>> {
    match stem {
        "caption" => Some(Property::Caption),
        "label" => Some(Property::Label),
        "tooltip" => Some(Property::Tooltip),
        "placeholder" => Some(Property::Placeholder),
        _ => None,
    }
}

impl Keywords {
    /// Run a keyword by name
    ///
    /// Returns the produced value for `LogValue`, `HasValue`, `ExecuteJS`
    /// and the `Log*` property keywords, `None` otherwise. A wrong argument
    /// count is [`ErrorKind::InvalidArgument`](crate::ErrorKind), an unknown
    /// name [`ErrorKind::NotFound`](crate::ErrorKind).
    pub fn run(&mut self, name: &str, args: &[&str]) -> OkwResult<Option<String>> {
        let key = normalize_keyword(name);
        debug!(keyword = name, args = args.len(), "dispatching keyword");
        match key.as_str() {
            // host / app
            "starthost" => {
                let [host] = arity::<1>(name, args)?;
                done(self.start_host(host))
            }
            "selecthost" => {
                let [host] = arity::<1>(name, args)?;
                done(self.select_host(host))
            }
            "stophost" => {
                arity::<0>(name, args)?;
                done(self.stop_host())
            }
            "startapp" => {
                let [path] = arity::<1>(name, args)?;
                done(self.start_app(path))
            }
            "selectapp" => {
                let [app] = arity::<1>(name, args)?;
                done(self.select_app(app))
            }
            "selectwindow" => {
                let [window] = arity::<1>(name, args)?;
                done(self.select_window(window))
            }
            "stopapp" => {
                arity::<0>(name, args)?;
                done(self.stop_app())
            }

            // widget
            "clickon" => {
                let [w] = arity::<1>(name, args)?;
                done(self.click_on(w))
            }
            "doubleclickon" => {
                let [w] = arity::<1>(name, args)?;
                done(self.double_click_on(w))
            }
            "setvalue" => {
                let [w, v] = arity::<2>(name, args)?;
                done(self.set_value(w, v))
            }
            "select" => {
                let [w, v] = arity::<2>(name, args)?;
                done(self.select(w, v))
            }
            "typekey" => {
                let [w, keys] = arity::<2>(name, args)?;
                done(self.type_key(w, keys))
            }
            "setfocus" => {
                let [w] = arity::<1>(name, args)?;
                done(self.set_focus(w))
            }
            "verifyvalue" | "verifyvaluewcm" | "verifyvalueregx" => {
                let [w, expected] = arity::<2>(name, args)?;
                let (_, mode) = split_mode(&key);
                done(self.verify_value(w, expected, mode))
            }
            "verifyexist" => {
                let [w, yes_no] = arity::<2>(name, args)?;
                done(self.verify_exist(w, yes_no))
            }
            "verifyhasfocus" => {
                let [w, yes_no] = arity::<2>(name, args)?;
                done(self.verify_has_focus(w, yes_no))
            }
            "verifyisvisible" => {
                let [w, yes_no] = arity::<2>(name, args)?;
                done(self.verify_is_visible(w, yes_no))
            }
            "verifyisenabled" => {
                let [w, yes_no] = arity::<2>(name, args)?;
                done(self.verify_is_enabled(w, yes_no))
            }
            "verifyiseditable" => {
                let [w, yes_no] = arity::<2>(name, args)?;
                done(self.verify_is_editable(w, yes_no))
            }
            "verifyisfocusable" => {
                let [w, yes_no] = arity::<2>(name, args)?;
                done(self.verify_is_focusable(w, yes_no))
            }
            "verifyisclickable" => {
                let [w, yes_no] = arity::<2>(name, args)?;
                done(self.verify_is_clickable(w, yes_no))
            }
            "logvalue" => {
                let [w] = arity::<1>(name, args)?;
                value(self.log_value(w))
            }
            "hasvalue" => {
                let [w] = arity::<1>(name, args)?;
                value(self.has_value(w).map(|yes| yes.as_str().to_string()))
            }
            "memorizevalue" => {
                let [w, var] = arity::<2>(name, args)?;
                done(self.memorize_value(w, var))
            }
            "executejs" => {
                let [script] = arity::<1>(name, args)?;
                value(self.execute_js(script))
            }

            // list
            "verifylistcount" => {
                let [w, count] = arity::<2>(name, args)?;
                done(self.verify_list_count(w, count))
            }
            "verifyselectedcount" => {
                let [w, count] = arity::<2>(name, args)?;
                done(self.verify_selected_count(w, count))
            }

            // table
            "verifytablerowcontent" => {
                let [w, row, pattern] = arity::<3>(name, args)?;
                done(self.verify_table_row_content(w, row, pattern))
            }
            "verifytablecolumncontent" => {
                let [w, col, pattern] = arity::<3>(name, args)?;
                done(self.verify_table_column_content(w, col, pattern))
            }
            "verifytablecellvalue" => {
                let [w, row, col, expected] = arity::<4>(name, args)?;
                done(self.verify_table_cell_value(w, row, col, expected))
            }
            "verifytablerowcount" => {
                let [w, count] = arity::<2>(name, args)?;
                done(self.verify_table_row_count(w, count))
            }
            "verifytablecolumncount" => {
                let [w, count] = arity::<2>(name, args)?;
                done(self.verify_table_column_count(w, count))
            }
            "verifytablehasrow" => {
                let [w, pattern] = arity::<2>(name, args)?;
                done(self.verify_table_has_row(w, pattern))
            }
            "verifytablecontent" => {
                let [w, pattern] = arity::<2>(name, args)?;
                done(self.verify_table_content(w, pattern))
            }
            "verifytablecellvaluebyheaders" => {
                let [w, row_key, header, expected] = arity::<4>(name, args)?;
                done(self.verify_table_cell_value_by_headers(w, row_key, header, expected))
            }
            "verifytablecellvaluebyheadersregx" => {
                let [w, row_key, header, expected] = arity::<4>(name, args)?;
                done(self.verify_table_cell_value_by_headers_regx(w, row_key, header, expected))
            }
            "verifytablerowcontentbyheader" => {
                let [w, header, cell, pattern] = arity::<4>(name, args)?;
                done(self.verify_table_row_content_by_header(w, header, cell, pattern))
            }
            "verifytablerowcontentbyheaderregx" => {
                let [w, header, cell, pattern] = arity::<4>(name, args)?;
                done(self.verify_table_row_content_by_header_regx(w, header, cell, pattern))
            }
            "verifytablecolumncontentbyheader" => {
                let [w, header, pattern] = arity::<3>(name, args)?;
                done(self.verify_table_column_content_by_header(w, header, pattern))
            }
            "verifytablecolumncontentbyheaderregx" => {
                let [w, header, pattern] = arity::<3>(name, args)?;
                done(self.verify_table_column_content_by_header_regx(w, header, pattern))
            }

            // parameters
            "setokwparameter" => {
                let [parameter, v] = arity::<2>(name, args)?;
                done(self.set_okw_parameter(parameter, v))
            }

            other => self.run_property(name, other, args),
        }
    }

    /// `Verify*`, `Memorize*` and `Log*` for caption, label, tooltip,
    /// placeholder and attribute
    fn run_property(&mut self, name: &str, key: &str, args: &[&str]) -> OkwResult<Option<String>> {
        let unknown = || OkwError::not_found(format!("Unknown keyword: {name}"));
        if let Some(stem) = key.strip_prefix("verify") {
            let (stem, mode) = split_mode(stem);
            if stem == "attribute" {
                let [w, attribute, expected] = arity::<3>(name, args)?;
                let property = Property::Attribute(attribute);
                return done(self.verify_property(property, w, expected, mode));
            }
            let property = simple_property(stem).ok_or_else(unknown)?;
            let [w, expected] = arity::<2>(name, args)?;
            return done(self.verify_property(property, w, expected, mode));
        }
        if let Some(stem) = key.strip_prefix("memorize") {
            if stem == "attribute" {
                let [w, attribute, var] = arity::<3>(name, args)?;
                return done(self.memorize_property(Property::Attribute(attribute), w, var));
            }
            let property = simple_property(stem).ok_or_else(unknown)?;
            let [w, var] = arity::<2>(name, args)?;
            return done(self.memorize_property(property, w, var));
        }
        if let Some(stem) = key.strip_prefix("log") {
            if stem == "attribute" {
                let [w, attribute] = arity::<2>(name, args)?;
                return value(self.log_property(Property::Attribute(attribute), w));
            }
            let property = simple_property(stem).ok_or_else(unknown)?;
            let [w] = arity::<1>(name, args)?;
            return value(self.log_property(property, w));
        }
        Err(unknown())
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
    use crate::session::SessionState;

    fn fixture() -> (Keywords, MockAdapter) {
        keywords(
            WindowModel::new()
                .with_widget("Name", "TextField", "id=name")
                .with_widget("Title", "Text", "id=title")
                .with_widget("Items", "Table", "id=items"),
        )
    }

    mod name_tests {
        use super::*;

        #[test]
        fn test_normalize() {
            assert_eq!(normalize_keyword("Verify Value WCM"), "verifyvaluewcm");
            assert_eq!(normalize_keyword("set_okw_parameter"), "setokwparameter");
            assert_eq!(normalize_keyword("ClickOn"), "clickon");
        }

        #[test]
        fn test_split_mode() {
            assert_eq!(split_mode("captionwcm"), ("caption", MatchMode::Wildcard));
            assert_eq!(split_mode("labelregx"), ("label", MatchMode::Regex));
            assert_eq!(split_mode("tooltip"), ("tooltip", MatchMode::Exact));
        }

        #[test]
        fn test_unknown_keyword() {
            let (mut kw, _) = fixture();
            let err = kw.run("Fly Away", &["Name"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
            assert_eq!(err.to_string(), "Unknown keyword: Fly Away");
            let err = kw.run("VerifyColour", &["Name", "red"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }

        #[test]
        fn test_wrong_arity() {
            let (mut kw, mock) = fixture();
            let err = kw.run("SetValue", &["Name"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            assert_eq!(
                err.to_string(),
                "Keyword 'SetValue' expects 2 argument(s), got 1"
            );
            assert!(!mock.was_called("set_value"));
        }
    }

    mod routing_tests {
        use super::*;

        #[test]
        fn test_widget_keywords() {
            let (mut kw, mock) = fixture();
            assert_eq!(kw.run("Set Value", &["Name", "alice"]).unwrap(), None);
            assert_eq!(mock.value_of("id=name"), "alice");
            kw.run("verify_value_wcm", &["Name", "ali*"]).unwrap();
            assert_eq!(kw.run("LOGVALUE", &["Name"]).unwrap(), Some("alice".into()));
            assert_eq!(kw.run("HasValue", &["Name"]).unwrap(), Some("YES".into()));
            kw.run("MemorizeValue", &["Name", "WHO"]).unwrap();
            assert_eq!(kw.variables().get("WHO"), Some("alice"));
            kw.run("ClickOn", &["Name"]).unwrap();
            assert!(mock.was_called("click"));
        }

        #[test]
        fn test_property_keywords() {
            let (mut kw, mock) = fixture();
            mock.element("id=title").text("Orders").attribute("role", "heading");
            kw.run("VerifyCaption", &["Title", "Orders"]).unwrap();
            kw.run("Verify Caption REGX", &["Title", "^Ord"]).unwrap();
            kw.run("VerifyAttributeWCM", &["Title", "role", "head*"]).unwrap();
            assert_eq!(
                kw.run("LogAttribute", &["Title", "role"]).unwrap(),
                Some("heading".into())
            );
            assert_eq!(kw.run("LogCaption", &["Title"]).unwrap(), Some("Orders".into()));
            kw.run("MemorizeCaption", &["Title", "HEAD"]).unwrap();
            assert_eq!(kw.variables().get("HEAD"), Some("Orders"));
            let err = kw.run("VerifyCaptionWCM", &["Title", "X*"]).unwrap_err();
            assert_eq!(err.keyword(), Some("VerifyCaptionWCM"));
        }

        #[test]
        fn test_table_keywords() {
            let (mut kw, mock) = fixture();
            mock.element("id=items")
                .table(TableData::new(["ID", "Name"], vec![vec!["1", "Foo"]]));
            kw.run("VerifyTableRowCount", &["Items", "1"]).unwrap();
            kw.run("VerifyTableCellValueByHeaders", &["Items", "1", "Name", "F*"])
                .unwrap();
            kw.run("VerifyTableRowContentByHeaderREGX", &["Items", "Name", "Foo", "1$TAB^F"])
                .unwrap();
        }

        #[test]
        fn test_parameter_and_lifecycle() {
            let (mut kw, _) = fixture();
            kw.run("SetOKWParameter", &["TimeOutVerifyValue", "1"]).unwrap();
            assert_eq!(kw.variables().get("${OKW_TIMEOUT_VERIFY_VALUE}"), Some("1"));
            kw.run("Select Host", &["mockadapter"]).unwrap();
            kw.run("Stop App", &[]).unwrap();
            assert_eq!(kw.session().state(), SessionState::HostActive);
            kw.run("StopHost", &[]).unwrap();
            assert_eq!(kw.session().state(), SessionState::NoHost);
        }

        #[test]
        fn test_execute_js() {
            let (mut kw, mock) = fixture();
            mock.set_script_result(serde_json::json!({"n": 1}));
            assert_eq!(
                kw.run("ExecuteJS", &["return {n: 1}"]).unwrap(),
                Some(r#"{"n":1}"#.into())
            );
        }
    }
}
