use movieweb_core::{Config, DataManager, SanitizedConfig};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    config: Config,
    manager: Arc<DataManager>,
}

impl AppState {
    pub fn new(config: Config, manager: Arc<DataManager>) -> Self {
        Self { config, manager }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    /// The data manager, the only writer of the library.
    pub fn manager(&self) -> &DataManager {
        self.manager.as_ref()
    }
}
