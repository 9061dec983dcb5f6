//! Caption, label, tooltip, placeholder and attribute keywords.
//!
//! Reads go through a degrade-to-empty wrapper: a getter failure is logged
//! and treated as `""`, so a verification against a non-empty value times
//! out with the empty text as last observation.

use super::widget::mode_keyword;
use super::{degrade, keyword, Keywords};
use crate::config::VerifyFamily;
use crate::matcher::MatchMode;
use crate::result::OkwResult;
use crate::widget::Widget;
use std::fmt;
use tracing::info;

/// Text property read by the property keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property<'a> {
    /// Visible text
    Caption,
    /// `aria-label`, else visible text
    Label,
    /// `title`, else `aria-label`
    Tooltip,
    /// `placeholder` attribute
    Placeholder,
    /// Named attribute
    Attribute(&'a str),
}

impl Property<'_> {
    /// Keyword stem, e.g. `Caption`
    pub const fn stem(self) -> &'static str {
        match self {
            Self::Caption => "Caption",
            Self::Label => "Label",
            Self::Tooltip => "Tooltip",
            Self::Placeholder => "Placeholder",
            Self::Attribute(_) => "Attribute",
        }
    }

    /// Timeout family
    pub const fn family(self) -> VerifyFamily {
        match self {
            Self::Caption => VerifyFamily::Caption,
            Self::Label => VerifyFamily::Label,
            Self::Tooltip => VerifyFamily::Tooltip,
            Self::Placeholder => VerifyFamily::Placeholder,
            Self::Attribute(_) => VerifyFamily::Attribute,
        }
    }

    fn read(self, w: &dyn Widget) -> OkwResult<String> {
        match self {
            Self::Caption => w.text(),
            Self::Label => w.label(),
            Self::Tooltip => w.tooltip(),
            Self::Placeholder => w.placeholder(),
            Self::Attribute(name) => w.attribute(name),
        }
    }
}

impl fmt::Display for Property<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute(name) => write!(f, "attribute '{name}'"),
            other => f.write_str(&other.stem().to_ascii_lowercase()),
        }
    }
}

impl Keywords {
    /// `VerifyP`, `VerifyPWCM`, `VerifyPREGX` for property P
    pub fn verify_property(
        &self,
        property: Property<'_>,
        name: &str,
        expected: &str,
        mode: MatchMode,
    ) -> OkwResult<()> {
        let kw = mode_keyword(&format!("Verify{}", property.stem()), mode);
        keyword(&kw, || {
            if self.skip(&kw, name, expected) {
                return Ok(());
            }
            let w = self.widget(name)?;
            self.verify_text(property.family(), name, expected, mode, || {
                Ok(degrade(&kw, name, property.read(w.as_ref())))
            })
        })
    }

    /// `MemorizeP name variable`
    pub fn memorize_property(
        &mut self,
        property: Property<'_>,
        name: &str,
        variable: &str,
    ) -> OkwResult<()> {
        let kw = format!("Memorize{}", property.stem());
        keyword(&kw, || {
            let value = {
                let w = self.widget(name)?;
                degrade(&kw, name, property.read(w.as_ref()))
            };
            self.variables.set(variable, value);
            Ok(())
        })
    }

    /// `LogP name`: log and return the property
    pub fn log_property(&self, property: Property<'_>, name: &str) -> OkwResult<String> {
        let kw = format!("Log{}", property.stem());
        keyword(&kw, || {
            let w = self.widget(name)?;
            let value = degrade(&kw, name, property.read(w.as_ref()));
            info!(keyword = %kw, widget = name, %property, value = %value);
            Ok(value)
        })
    }

    /// `VerifyCaption` in the given mode
    pub fn verify_caption(&self, name: &str, expected: &str, mode: MatchMode) -> OkwResult<()> {
        self.verify_property(Property::Caption, name, expected, mode)
    }

    /// `VerifyLabel` in the given mode
    pub fn verify_label(&self, name: &str, expected: &str, mode: MatchMode) -> OkwResult<()> {
        self.verify_property(Property::Label, name, expected, mode)
    }

    /// `VerifyTooltip` in the given mode
    pub fn verify_tooltip(&self, name: &str, expected: &str, mode: MatchMode) -> OkwResult<()> {
        self.verify_property(Property::Tooltip, name, expected, mode)
    }

    /// `VerifyPlaceholder` in the given mode
    pub fn verify_placeholder(&self, name: &str, expected: &str, mode: MatchMode) -> OkwResult<()> {
        self.verify_property(Property::Placeholder, name, expected, mode)
    }

    /// `VerifyAttribute name attribute expected` in the given mode
    pub fn verify_attribute(
        &self,
        name: &str,
        attribute: &str,
        expected: &str,
        mode: MatchMode,
    ) -> OkwResult<()> {
        self.verify_property(Property::Attribute(attribute), name, expected, mode)
    }
}
