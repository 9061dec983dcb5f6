//! Runtime parameters.

use super::{keyword, Keywords};
use crate::config::parameter_variable;
use crate::result::OkwResult;
use tracing::info;

impl Keywords {
    /// `SetOKWParameter name value`
    ///
    /// `name` is a timeout such as `TimeOutVerifyTable` or `PollVerify`, in
    /// any case. The value is stored as given and parsed when read.
    pub fn set_okw_parameter(&mut self, name: &str, value: &str) -> OkwResult<()> {
        keyword("SetOKWParameter", || {
            let variable = parameter_variable(name)?;
            info!(parameter = name, variable, value, "OKW parameter set");
            self.variables.set(variable, value);
            Ok(())
        })
    }
}
