//! Widget action and verification keywords.

use super::{keyword, Keywords, StateCheck};
use crate::adapter::Capability;
use crate::config::VerifyFamily;
use crate::matcher::MatchMode;
use crate::result::{OkwError, OkwResult};
use crate::tokens::YesNo;
use tracing::{debug, info};

const EXIST: StateCheck = StateCheck::new(VerifyFamily::Exist, None, "exist", "does");
const FOCUS: StateCheck =
    StateCheck::new(VerifyFamily::Focus, Some(Capability::HasFocus), "have focus", "does");
const VISIBLE: StateCheck =
    StateCheck::new(VerifyFamily::Visible, Some(Capability::Visible), "be visible", "is");
const ENABLED: StateCheck =
    StateCheck::new(VerifyFamily::Enabled, Some(Capability::Enabled), "be enabled", "is");
const EDITABLE: StateCheck =
    StateCheck::new(VerifyFamily::Editable, Some(Capability::Editable), "be editable", "is");
const FOCUSABLE: StateCheck =
    StateCheck::new(VerifyFamily::Focusable, Some(Capability::Focusable), "be focusable", "is");
const CLICKABLE: StateCheck =
    StateCheck::new(VerifyFamily::Clickable, Some(Capability::Clickable), "be clickable", "is");

/// `VerifyValue`, `VerifyValueWCM` or `VerifyValueREGX`
pub(super) fn mode_keyword(base: &str, mode: MatchMode) -> String {
    match mode {
        MatchMode::Exact => base.to_string(),
        other => format!("{base}{}", other.as_str()),
    }
}

impl Keywords {
    /// `ClickOn name`
    pub fn click_on(&self, name: &str) -> OkwResult<()> {
        keyword("ClickOn", || self.widget(name)?.click())
    }

    /// `DoubleClickOn name`
    pub fn double_click_on(&self, name: &str) -> OkwResult<()> {
        keyword("DoubleClickOn", || self.widget(name)?.double_click())
    }

    /// `SetValue name value`
    ///
    /// The empty token sets `""` and is never ignored.
    pub fn set_value(&self, name: &str, value: &str) -> OkwResult<()> {
        keyword("SetValue", || {
            if self.variables.tokens().is_empty_token(value) {
                return self.widget(name)?.set_value("");
            }
            if self.skip("SetValue", name, value) {
                return Ok(());
            }
            self.widget(name)?.set_value(value)
        })
    }

    /// `Select name value`
    pub fn select(&self, name: &str, value: &str) -> OkwResult<()> {
        keyword("Select", || {
            if self.skip("Select", name, value) {
                return Ok(());
            }
            self.widget(name)?.select(value)
        })
    }

    /// `TypeKey name keys`
    ///
    /// The delete token clears the field, first through `clear_text`, then by
    /// clicking and pressing CTRL+A and DELETE. When both fail the token is
    /// typed like any other input.
    pub fn type_key(&self, name: &str, keys: &str) -> OkwResult<()> {
        keyword("TypeKey", || {
            if self.variables.tokens().is_delete_token(keys) {
                let w = self.widget(name)?;
                match w.delete() {
                    Ok(()) => return Ok(()),
                    Err(err) => debug!(widget = name, error = %err, "delete token failed"),
                }
            }
            if self.skip("TypeKey", name, keys) {
                return Ok(());
            }
            self.widget(name)?.type_key(keys)
        })
    }

    /// `VerifyValue`, `VerifyValueWCM`, `VerifyValueREGX`
    pub fn verify_value(&self, name: &str, expected: &str, mode: MatchMode) -> OkwResult<()> {
        let kw = mode_keyword("VerifyValue", mode);
        keyword(&kw, || {
            if self.skip(&kw, name, expected) {
                return Ok(());
            }
            let w = self.widget(name)?;
            self.verify_text(VerifyFamily::Value, name, expected, mode, || w.value())
        })
    }

    /// `VerifyExist name YES|NO`
    pub fn verify_exist(&self, name: &str, expected: &str) -> OkwResult<()> {
        keyword("VerifyExist", || {
            self.verify_state(EXIST, name, expected, |w| w.exists())
        })
    }

    /// `VerifyHasFocus name YES|NO`
    pub fn verify_has_focus(&self, name: &str, expected: &str) -> OkwResult<()> {
        keyword("VerifyHasFocus", || {
            self.verify_state(FOCUS, name, expected, |w| w.has_focus())
        })
    }

    /// `VerifyIsVisible name YES|NO`
    pub fn verify_is_visible(&self, name: &str, expected: &str) -> OkwResult<()> {
        keyword("VerifyIsVisible", || {
            self.verify_state(VISIBLE, name, expected, |w| w.is_visible())
        })
    }

    /// `VerifyIsEnabled name YES|NO`
    pub fn verify_is_enabled(&self, name: &str, expected: &str) -> OkwResult<()> {
        keyword("VerifyIsEnabled", || {
            self.verify_state(ENABLED, name, expected, |w| w.is_enabled())
        })
    }

    /// `VerifyIsEditable name YES|NO`
    pub fn verify_is_editable(&self, name: &str, expected: &str) -> OkwResult<()> {
        keyword("VerifyIsEditable", || {
            self.verify_state(EDITABLE, name, expected, |w| w.is_editable())
        })
    }

    /// `VerifyIsFocusable name YES|NO`
    pub fn verify_is_focusable(&self, name: &str, expected: &str) -> OkwResult<()> {
        keyword("VerifyIsFocusable", || {
            self.verify_state(FOCUSABLE, name, expected, |w| w.is_focusable())
        })
    }

    /// `VerifyIsClickable name YES|NO`
    pub fn verify_is_clickable(&self, name: &str, expected: &str) -> OkwResult<()> {
        keyword("VerifyIsClickable", || {
            self.verify_state(CLICKABLE, name, expected, |w| w.is_clickable())
        })
    }

    /// `LogValue name`: log and return the current value
    pub fn log_value(&self, name: &str) -> OkwResult<String> {
        keyword("LogValue", || {
            let value = self.widget(name)?.value()?;
            info!(keyword = "LogValue", widget = name, value = %value);
            Ok(value)
        })
    }

    /// `HasValue name`: `YES` when the value is not blank
    pub fn has_value(&self, name: &str) -> OkwResult<YesNo> {
        keyword("HasValue", || {
            let value = self.widget(name)?.value()?;
            Ok(YesNo::from(!value.trim().is_empty()))
        })
    }

    /// `MemorizeValue name variable`: store the value in `${variable}`
    pub fn memorize_value(&mut self, name: &str, variable: &str) -> OkwResult<()> {
        keyword("MemorizeValue", || {
            let value = self.widget(name)?.value()?;
            self.variables.set(variable, value);
            Ok(())
        })
    }

    /// `SetFocus name`
    pub fn set_focus(&self, name: &str) -> OkwResult<()> {
        keyword("SetFocus", || self.widget(name)?.set_focus())
    }

    /// `ExecuteJS script`: run a script in the driver
    ///
    /// Strings come back as is, other JSON values in their JSON text.
    pub fn execute_js(&self, script: &str) -> OkwResult<String> {
        keyword("ExecuteJS", || {
            let adapter = self.session.adapter()?;
            if !adapter.supports(Capability::ExecuteScript) {
                return Err(OkwError::not_supported(format!(
                    "Not supported by adapter '{}'",
                    adapter.name()
                )));
            }
            Ok(match adapter.execute_script(script)? {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
        })
    }
}
