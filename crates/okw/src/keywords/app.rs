//! App and window keywords.

use super::host::model_key;
use super::{keyword, Keywords};
use crate::model::AppModel;
use crate::result::{OkwError, OkwResult};

impl Keywords {
    /// `StartApp path`: load model `path`; the app is its last `/` segment
    pub fn start_app(&mut self, path: &str) -> OkwResult<()> {
        keyword("StartApp", || {
            let root = self.loader.load(path)?;
            let name = model_key(path);
            let value = root.get(name).ok_or_else(|| {
                OkwError::not_found(format!("App name '{name}' not found in YAML root"))
            })?;
            let model = AppModel::from_value(value)?;
            Ok(self.session.start_app(name, model)?)
        })
    }

    /// `SelectApp name`
    pub fn select_app(&mut self, name: &str) -> OkwResult<()> {
        keyword("SelectApp", || Ok(self.session.select_app(name)?))
    }

    /// `SelectWindow name`
    pub fn select_window(&mut self, name: &str) -> OkwResult<()> {
        keyword("SelectWindow", || Ok(self.session.select_window(name)?))
    }

    /// `StopApp`
    pub fn stop_app(&mut self) -> OkwResult<()> {
        keyword("StopApp", || Ok(self.session.stop_app()?))
    }
}
