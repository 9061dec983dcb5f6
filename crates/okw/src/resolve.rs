//! Logical widget name to bound widget.

use crate::result::{OkwError, OkwResult};
use crate::session::Session;
use crate::widget::{Widget, WidgetContext, WidgetRegistry};
use tracing::debug;

/// Build the widget `name` of the selected window
///
/// The widget borrows the session's adapter for the duration of one keyword
/// call. Nothing is cached; every call re-reads the window model.
pub fn resolve_widget<'s>(
    session: &'s Session,
    registry: &WidgetRegistry,
    name: &str,
) -> OkwResult<Box<dyn Widget + 's>> {
    let window = session.current_window_model()?;
    let adapter = session.adapter()?;
    let definition = window.widget(name)?.ok_or_else(|| {
        OkwError::not_found(format!("Widget '{name}' not found in current window."))
    })?;
    debug!(
        widget = name,
        class = %definition.class,
        locator = ?definition.locator,
        "resolved widget"
    );
    let ctx = WidgetContext::new(name, definition.class, adapter, definition.locator)
        .with_options(definition.options);
    registry.build(ctx)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::mock::MockAdapter;
    use crate::model::{AppModel, WindowModel};
    use crate::result::ErrorKind;
    use crate::session::ContextError;
    use serde_yaml_ng::Value;

    fn session(window: WindowModel) -> Session {
        let mut s = Session::new();
        s.start_host(Box::new(MockAdapter::new()));
        s.start_app("Demo", AppModel::new().with_window("Main", window))
            .unwrap();
        s.select_window("Main").unwrap();
        s
    }

    #[test]
    fn test_resolves_builtin() {
        let s = session(WindowModel::new().with_widget("User", "TextField", "id=user"));
        let w = resolve_widget(&s, &WidgetRegistry::default(), "User").unwrap();
        assert_eq!(w.context().name, "User");
        assert_eq!(w.context().kind, "TextField");
        assert_eq!(w.context().locator_text(), "id=user");
    }

    #[test]
    fn test_missing_widget() {
        let s = session(WindowModel::new());
        let err = resolve_widget(&s, &WidgetRegistry::default(), "Ghost").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Widget 'Ghost' not found in current window.");
    }

    #[test]
    fn test_missing_class() {
        let entry: Value = serde_yaml_ng::from_str("locator: id=x").unwrap();
        let s = session(WindowModel::new().with_entry("Bad", entry));
        let err = resolve_widget(&s, &WidgetRegistry::default(), "Bad").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_unknown_class() {
        let s = session(WindowModel::new().with_widget("Dial", "Spinner", "id=d"));
        let err = resolve_widget(&s, &WidgetRegistry::default(), "Dial").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_options_pass_through() {
        let entry: Value =
            serde_yaml_ng::from_str("{class: Table, locator: id=t, row_key_column: 2}").unwrap();
        let s = session(WindowModel::new().with_entry("Grid", entry));
        let w = resolve_widget(&s, &WidgetRegistry::default(), "Grid").unwrap();
        assert_eq!(w.row_key_column_index().unwrap(), 2);
    }

    #[test]
    fn test_needs_window() {
        let s = Session::new();
        let err = resolve_widget(&s, &WidgetRegistry::default(), "User").unwrap_err();
        assert!(matches!(err, OkwError::Context(ContextError::NoAdapter)));
    }
}
