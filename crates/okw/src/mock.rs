//! In-memory adapter for keyword and widget tests.
//!
//! [`MockAdapter`] keeps a small element store keyed by the rendered
//! locator. Clones share state, so a test can hand one clone to the session
//! and inspect or change the UI through another:
//!
//! ```rust,ignore
//! let mock = MockAdapter::new();
//! kw.start_host_with(mock.clone());
//! mock.element("id=user").queue_values(["", "", "admin"]);
//! kw.verify_value("Username", "admin", MatchMode::Exact)?;
//! assert!(mock.was_called("get_value"));
//! ```
//!
//! Unknown locators behave like a default element that exists, is visible,
//! enabled, editable, focusable and clickable.

use crate::adapter::{unsupported, Adapter, Capability, TableData};
use crate::model::{HostDefinition, Locator};
use crate::result::{OkwError, OkwResult};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::rc::Rc;

/// Keys that do not produce text
const CONTROL_KEYS: &[&str] = &["ENTER", "TAB", "ESC", "ESCAPE", "CTRL+A", "SHIFT+TAB"];

/// State of one mock element
#[derive(Debug, Clone, PartialEq)]
pub struct MockElement {
    /// Present in the UI
    pub exists: bool,
    /// Displayed
    pub visible: bool,
    /// Accepts interaction
    pub enabled: bool,
    /// Accepts text
    pub editable: bool,
    /// Can take focus
    pub focusable: bool,
    /// Click reaches it
    pub clickable: bool,
    /// Visible text
    pub text: String,
    /// Input value
    pub value: String,
    /// Values handed out by `get_value` before `value`
    pub pending_values: VecDeque<String>,
    /// Attributes
    pub attributes: BTreeMap<String, String>,
    /// List entries; empty accepts any label
    pub options: Vec<String>,
    /// Selected entries
    pub selected: Vec<String>,
    /// Table snapshot
    pub table: TableData,
}

impl Default for MockElement {
    fn default() -> Self {
        Self {
            exists: true,
            visible: true,
            enabled: true,
            editable: true,
            focusable: true,
            clickable: true,
            text: String::new(),
            value: String::new(),
            pending_values: VecDeque::new(),
            attributes: BTreeMap::new(),
            options: Vec::new(),
            selected: Vec::new(),
            table: TableData::default(),
        }
    }
}

#[derive(Debug)]
struct MockState {
    disabled: BTreeSet<Capability>,
    elements: BTreeMap<String, MockElement>,
    focused: Option<String>,
    script_result: serde_json::Value,
    calls: Vec<(String, String)>,
}

/// Scriptable in-memory [`Adapter`]
#[derive(Debug, Clone)]
pub struct MockAdapter {
    name: Rc<str>,
    state: Rc<RefCell<MockState>>,
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAdapter {
    /// Create a mock named `MockAdapter` supporting every capability
    #[must_use]
    pub fn new() -> Self {
        Self::named("MockAdapter")
    }

    /// Create a mock with a custom adapter name
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            name: Rc::from(name),
            state: Rc::new(RefCell::new(MockState {
                disabled: BTreeSet::new(),
                elements: BTreeMap::new(),
                focused: None,
                script_result: serde_json::Value::Null,
                calls: Vec::new(),
            })),
        }
    }

    /// Remove a capability
    #[must_use]
    pub fn without(self, capability: Capability) -> Self {
        self.state.borrow_mut().disabled.insert(capability);
        self
    }

    /// Edit the element at `locator`, creating it if needed
    pub fn element(&self, locator: &str) -> MockElementHandle {
        self.state
            .borrow_mut()
            .elements
            .entry(locator.to_string())
            .or_default();
        MockElementHandle {
            state: Rc::clone(&self.state),
            key: locator.to_string(),
        }
    }

    /// Snapshot of an element
    pub fn element_state(&self, locator: &str) -> Option<MockElement> {
        self.state.borrow().elements.get(locator).cloned()
    }

    /// Current value of an element
    pub fn value_of(&self, locator: &str) -> String {
        self.element_state(locator)
            .map(|e| e.value)
            .unwrap_or_default()
    }

    /// Result returned by `execute_script`
    pub fn set_script_result(&self, value: serde_json::Value) {
        self.state.borrow_mut().script_result = value;
    }

    /// Recorded `(method, detail)` calls
    pub fn calls(&self) -> Vec<(String, String)> {
        self.state.borrow().calls.clone()
    }

    /// Whether `method` was called at least once
    pub fn was_called(&self, method: &str) -> bool {
        self.state.borrow().calls.iter().any(|(m, _)| m == method)
    }

    /// Number of calls to `method`
    pub fn call_count(&self, method: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    fn enter(&self, capability: Capability, detail: &str) -> OkwResult<()> {
        let mut state = self.state.borrow_mut();
        if state.disabled.contains(&capability) {
            return Err(unsupported(&self.name, capability));
        }
        state
            .calls
            .push((capability.method_name().to_string(), detail.to_string()));
        Ok(())
    }

    fn read<T>(
        &self,
        capability: Capability,
        locator: &Locator,
        f: impl FnOnce(&MockElement) -> T,
    ) -> OkwResult<T> {
        let key = locator.to_string();
        self.enter(capability, &key)?;
        let state = self.state.borrow();
        Ok(match state.elements.get(&key) {
            Some(element) => f(element),
            None => f(&MockElement::default()),
        })
    }

    fn write<T>(
        &self,
        capability: Capability,
        locator: &Locator,
        detail: &str,
        f: impl FnOnce(&mut MockElement) -> OkwResult<T>,
    ) -> OkwResult<T> {
        let key = locator.to_string();
        self.enter(capability, format!("{key} {detail}").trim_end())?;
        let mut state = self.state.borrow_mut();
        f(state.elements.entry(key).or_default())
    }
}

/// Builder for one element of a [`MockAdapter`]
#[derive(Debug)]
pub struct MockElementHandle {
    state: Rc<RefCell<MockState>>,
    key: String,
}

impl MockElementHandle {
    fn edit(self, f: impl FnOnce(&mut MockElement)) -> Self {
        {
            let mut state = self.state.borrow_mut();
            f(state.elements.entry(self.key.clone()).or_default());
        }
        self
    }

    /// Set presence
    pub fn exists(self, exists: bool) -> Self {
        self.edit(|e| e.exists = exists)
    }

    /// Set visibility
    pub fn visible(self, visible: bool) -> Self {
        self.edit(|e| e.visible = visible)
    }

    /// Set enabled state
    pub fn enabled(self, enabled: bool) -> Self {
        self.edit(|e| e.enabled = enabled)
    }

    /// Set editable state
    pub fn editable(self, editable: bool) -> Self {
        self.edit(|e| e.editable = editable)
    }

    /// Set focusable state
    pub fn focusable(self, focusable: bool) -> Self {
        self.edit(|e| e.focusable = focusable)
    }

    /// Set clickable state
    pub fn clickable(self, clickable: bool) -> Self {
        self.edit(|e| e.clickable = clickable)
    }

    /// Set visible text
    pub fn text(self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.edit(|e| e.text = text)
    }

    /// Set input value
    pub fn value(self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.edit(|e| e.value = value)
    }

    /// Values returned by successive `get_value` calls; the last one sticks
    pub fn queue_values<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        self.edit(|e| e.pending_values.extend(values))
    }

    /// Set an attribute
    pub fn attribute(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let (name, value) = (name.into(), value.into());
        self.edit(|e| {
            e.attributes.insert(name, value);
        })
    }

    /// Set list entries
    pub fn options<I, S>(self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        self.edit(|e| e.options = options)
    }

    /// Set selected entries
    pub fn selected<I, S>(self, selected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selected: Vec<String> = selected.into_iter().map(Into::into).collect();
        self.edit(|e| e.selected = selected)
    }

    /// Set the table snapshot
    pub fn table(self, table: TableData) -> Self {
        self.edit(|e| e.table = table)
    }
}

fn check_option(element: &MockElement, label: &str) -> OkwResult<()> {
    if element.options.is_empty() || element.options.iter().any(|o| o == label) {
        Ok(())
    } else {
        Err(OkwError::not_found(format!("No option '{label}'")))
    }
}

impl Adapter for MockAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, capability: Capability) -> bool {
        !self.state.borrow().disabled.contains(&capability)
    }

    fn element_exists(&self, locator: &Locator) -> OkwResult<bool> {
        self.read(Capability::ElementExists, locator, |e| e.exists)
    }

    fn is_visible(&self, locator: &Locator) -> OkwResult<bool> {
        self.read(Capability::Visible, locator, |e| e.exists && e.visible)
    }

    fn is_enabled(&self, locator: &Locator) -> OkwResult<bool> {
        self.read(Capability::Enabled, locator, |e| e.exists && e.enabled)
    }

    fn is_editable(&self, locator: &Locator) -> OkwResult<bool> {
        self.read(Capability::Editable, locator, |e| e.exists && e.editable)
    }

    fn is_focusable(&self, locator: &Locator) -> OkwResult<bool> {
        self.read(Capability::Focusable, locator, |e| e.exists && e.focusable)
    }

    fn is_clickable(&self, locator: &Locator) -> OkwResult<bool> {
        self.read(Capability::Clickable, locator, |e| e.exists && e.clickable)
    }

    fn has_focus(&self, locator: &Locator) -> OkwResult<bool> {
        let key = locator.to_string();
        self.enter(Capability::HasFocus, &key)?;
        Ok(self.state.borrow().focused.as_deref() == Some(key.as_str()))
    }

    fn focus(&self, locator: &Locator) -> OkwResult<()> {
        let key = locator.to_string();
        self.enter(Capability::Focus, &key)?;
        self.state.borrow_mut().focused = Some(key);
        Ok(())
    }

    fn get_text(&self, locator: &Locator) -> OkwResult<String> {
        self.read(Capability::GetText, locator, |e| e.text.clone())
    }

    fn get_value(&self, locator: &Locator) -> OkwResult<String> {
        self.write(Capability::GetValue, locator, "", |e| {
            if let Some(next) = e.pending_values.pop_front() {
                e.value = next;
            }
            Ok(e.value.clone())
        })
    }

    fn get_attribute(&self, locator: &Locator, name: &str) -> OkwResult<Option<String>> {
        self.read(Capability::GetAttribute, locator, |e| {
            e.attributes.get(name).cloned()
        })
    }

    fn input_text(&self, locator: &Locator, text: &str) -> OkwResult<()> {
        self.write(Capability::InputText, locator, text, |e| {
            e.value.push_str(text);
            Ok(())
        })
    }

    fn clear_text(&self, locator: &Locator) -> OkwResult<()> {
        self.write(Capability::ClearText, locator, "", |e| {
            e.value.clear();
            Ok(())
        })
    }

    fn click(&self, locator: &Locator) -> OkwResult<()> {
        self.write(Capability::Click, locator, "", |_| Ok(()))
    }

    fn double_click(&self, locator: &Locator) -> OkwResult<()> {
        self.write(Capability::DoubleClick, locator, "", |_| Ok(()))
    }

    fn press_keys(&self, locator: &Locator, keys: &str) -> OkwResult<()> {
        self.write(Capability::PressKeys, locator, keys, |e| {
            let upper = keys.trim().to_ascii_uppercase();
            if upper == "DELETE" || upper == "BACKSPACE" {
                e.value.clear();
            } else if !CONTROL_KEYS.contains(&upper.as_str()) {
                e.value.push_str(keys);
            }
            Ok(())
        })
    }

    fn select_by_label(&self, locator: &Locator, label: &str) -> OkwResult<()> {
        self.write(Capability::SelectByLabel, locator, label, |e| {
            check_option(e, label)?;
            if !e.selected.iter().any(|s| s == label) {
                e.selected.push(label.to_string());
            }
            Ok(())
        })
    }

    fn unselect_all(&self, locator: &Locator) -> OkwResult<()> {
        self.write(Capability::UnselectAll, locator, "", |e| {
            e.selected.clear();
            Ok(())
        })
    }

    fn selected_labels(&self, locator: &Locator) -> OkwResult<Vec<String>> {
        self.read(Capability::SelectedLabels, locator, |e| e.selected.clone())
    }

    fn option_count(&self, locator: &Locator) -> OkwResult<usize> {
        self.read(Capability::OptionCount, locator, |e| e.options.len())
    }

    fn select_radio(&self, group: &Locator, value: &str) -> OkwResult<()> {
        self.write(Capability::SelectRadio, group, value, |e| {
            check_option(e, value)?;
            e.selected = vec![value.to_string()];
            Ok(())
        })
    }

    fn read_table(&self, locator: &Locator) -> OkwResult<TableData> {
        self.read(Capability::ReadTable, locator, |e| e.table.clone())
    }

    fn scroll_into_view(&self, locator: &Locator) -> OkwResult<()> {
        self.write(Capability::ScrollIntoView, locator, "", |_| Ok(()))
    }

    fn execute_script(&self, script: &str) -> OkwResult<serde_json::Value> {
        self.enter(Capability::ExecuteScript, script)?;
        Ok(self.state.borrow().script_result.clone())
    }
}

/// Host factory building a fresh [`MockAdapter`]
///
/// Register it under a tag such as `MockAdapter` to drive `StartHost` from a
/// model file without a real driver.
pub fn mock_host(_definition: &HostDefinition) -> OkwResult<Box<dyn Adapter>> {
    Ok(Box::new(MockAdapter::new()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::result::ErrorKind;

    fn loc(s: &str) -> Locator {
        Locator::from(s)
    }

    #[test]
    fn test_default_element_state() {
        let mock = MockAdapter::new();
        assert!(mock.element_exists(&loc("id=any")).unwrap());
        assert!(mock.is_visible(&loc("id=any")).unwrap());
        assert!(!mock.has_focus(&loc("id=any")).unwrap());
        assert_eq!(mock.get_text(&loc("id=any")).unwrap(), "");
    }

    #[test]
    fn test_missing_element_is_not_visible() {
        let mock = MockAdapter::new();
        mock.element("id=gone").exists(false);
        assert!(!mock.element_exists(&loc("id=gone")).unwrap());
        assert!(!mock.is_visible(&loc("id=gone")).unwrap());
    }

    #[test]
    fn test_clones_share_state() {
        let mock = MockAdapter::new();
        let other = mock.clone();
        other.input_text(&loc("id=a"), "hi").unwrap();
        assert_eq!(mock.value_of("id=a"), "hi");
        assert!(mock.was_called("input_text"));
    }

    #[test]
    fn test_queued_values() {
        let mock = MockAdapter::new();
        mock.element("id=a").queue_values(["1", "2"]);
        let l = loc("id=a");
        assert_eq!(mock.get_value(&l).unwrap(), "1");
        assert_eq!(mock.get_value(&l).unwrap(), "2");
        assert_eq!(mock.get_value(&l).unwrap(), "2");
        assert_eq!(mock.call_count("get_value"), 3);
    }

    #[test]
    fn test_disabled_capability() {
        let mock = MockAdapter::new().without(Capability::Visible);
        assert!(!mock.supports(Capability::Visible));
        assert!(mock.supports(Capability::Enabled));
        let err = mock.is_visible(&loc("id=a")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
    }

    #[test]
    fn test_option_checks() {
        let mock = MockAdapter::new();
        mock.element("id=l").options(["A"]);
        assert!(mock.select_by_label(&loc("id=l"), "B").is_err());
        mock.select_by_label(&loc("id=l"), "A").unwrap();
        assert_eq!(mock.selected_labels(&loc("id=l")).unwrap(), vec!["A"]);
    }

    #[test]
    fn test_keys() {
        let mock = MockAdapter::new();
        let l = loc("id=t");
        mock.press_keys(&l, "ab").unwrap();
        mock.press_keys(&l, "ENTER").unwrap();
        assert_eq!(mock.value_of("id=t"), "ab");
        mock.press_keys(&l, "DELETE").unwrap();
        assert_eq!(mock.value_of("id=t"), "");
    }

    #[test]
    fn test_script_result() {
        let mock = MockAdapter::new();
        mock.set_script_result(serde_json::json!({"ok": true}));
        assert_eq!(
            mock.execute_script("return 1").unwrap(),
            serde_json::json!({"ok": true})
        );
    }

    #[test]
    fn test_mock_host_factory() {
        let def = HostDefinition {
            name: "Mock".into(),
            class: "MockAdapter".into(),
            args: BTreeMap::new(),
        };
        assert_eq!(mock_host(&def).unwrap().name(), "MockAdapter");
    }
}
