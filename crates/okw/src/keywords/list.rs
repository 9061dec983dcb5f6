//! List count keywords.

use super::{keyword, poll_check, Keywords};
use crate::config::VerifyFamily;
use crate::result::{ErrorKind, OkwError, OkwResult};
use crate::widget::Widget;

/// Parse an integer count argument
pub(super) fn parse_count(value: &str) -> OkwResult<usize> {
    value.trim().parse().map_err(|_| {
        OkwError::invalid_argument(format!("Expected must be integer, got '{value}'"))
    })
}

impl Keywords {
    /// `VerifyListCount name count`
    pub fn verify_list_count(&self, name: &str, expected: &str) -> OkwResult<()> {
        keyword("VerifyListCount", || {
            self.verify_count(name, expected, |w| w.list_count())
        })
    }

    /// `VerifySelectedCount name count`
    pub fn verify_selected_count(&self, name: &str, expected: &str) -> OkwResult<()> {
        keyword("VerifySelectedCount", || {
            self.verify_count(name, expected, |w| w.selected_count())
        })
    }

    fn verify_count(
        &self,
        name: &str,
        expected: &str,
        count: fn(&dyn Widget) -> OkwResult<usize>,
    ) -> OkwResult<()> {
        let want = parse_count(expected)?;
        let w = self.widget(name)?;
        poll_check(self.variables.poll_spec(VerifyFamily::List), || {
            let got = count(w.as_ref()).map_err(|err| match err.kind() {
                ErrorKind::NotSupported => {
                    OkwError::not_supported(format!("Not supported by widget '{name}': {err}"))
                }
                _ => err,
            })?;
            Ok((got != want).then(|| {
                OkwError::timeout(
                    format!("Expected {want}, got {got}"),
                    want.to_string(),
                    got.to_string(),
                    None,
                )
            }))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::keywords::fixture::keywords;
    use crate::model::WindowModel;

    fn window() -> WindowModel {
        WindowModel::new()
            .with_widget("Colors", "ListBox", "id=colors")
            .with_widget("Name", "TextField", "id=name")
    }

    #[test]
    fn test_counts() {
        let (kw, mock) = keywords(window());
        mock.element("id=colors")
            .options(["Red", "Green", "Blue"])
            .selected(["Red"]);
        kw.verify_list_count("Colors", "3").unwrap();
        kw.verify_selected_count("Colors", " 1 ").unwrap();
        kw.select("Colors", "Green").unwrap();
        kw.verify_selected_count("Colors", "2").unwrap();
    }

    #[test]
    fn test_mismatch() {
        let (kw, mock) = keywords(window());
        mock.element("id=colors").options(["Red"]);
        let err = kw.verify_list_count("Colors", "2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.to_string(), "[VerifyListCount] Expected 2, got 1");
    }

    #[test]
    fn test_not_integer() {
        let (kw, _) = keywords(window());
        let err = kw.verify_selected_count("Colors", "two").unwrap_err();
        assert_eq!(
            err.to_string(),
            "[VerifySelectedCount] Expected must be integer, got 'two'"
        );
    }

    #[test]
    fn test_widget_without_lists() {
        let (kw, _) = keywords(window());
        let err = kw.verify_list_count("Name", "0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
        assert_eq!(
            err.to_string(),
            "[VerifyListCount] Not supported by widget 'Name': \
             Widget 'Name' (TextField) does not support 'list_count'"
        );
    }
}
