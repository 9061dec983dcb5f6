//! Host lifecycle keywords.

use super::{keyword, Keywords};
use crate::model::HostDefinition;
use crate::result::OkwResult;
use crate::session::ContextError;
use tracing::info;

/// Last `/` segment of a model path
pub(super) fn model_key(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

impl Keywords {
    /// `StartHost name`: load model `name`, build its adapter and make it active
    pub fn start_host(&mut self, name: &str) -> OkwResult<()> {
        keyword("StartHost", || {
            let root = self.loader.load(name)?;
            let definition = HostDefinition::from_model(&root, model_key(name))?;
            let adapter = self.hosts.create(&definition)?;
            info!(host = name, class = %definition.class, "starting host");
            self.session.start_host(adapter);
            Ok(())
        })
    }

    /// `SelectHost name`: the active adapter must be called `name`
    pub fn select_host(&self, name: &str) -> OkwResult<()> {
        keyword("SelectHost", || {
            let active = self.session.adapter()?.name();
            if active.eq_ignore_ascii_case(name) {
                info!(host = name, "host is active");
                Ok(())
            } else {
                Err(ContextError::HostMismatch {
                    requested: name.to_string(),
                    active: active.to_string(),
                }
                .into())
            }
        })
    }

    /// `StopHost`
    pub fn stop_host(&mut self) -> OkwResult<()> {
        keyword("StopHost", || Ok(self.session.stop_host()?))
    }
}
