//! Application state for the fiber workflow engine API.

use std::sync::Arc;

use crate::config::{ConfigLoader, EngineConfig, RateCard};
use crate::error::EngineResult;

/// Shared application state.
///
/// Holds the immutable engine configuration shared by every handler.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates state from the built-in configuration.
    pub fn standard() -> Self {
        Self::new(ConfigLoader::from_config(EngineConfig::standard()))
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        self.config.config()
    }

    /// Looks up a rate card by id.
    pub fn rate_card(&self, id: &str) -> EngineResult<&RateCard> {
        self.config.rate_card(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_standard_state_has_vexus_card() {
        let state = AppState::standard();
        assert!(state.rate_card("vexus-la-tx-2026").is_ok());
        assert!(state.rate_card("missing").is_err());
    }
}
