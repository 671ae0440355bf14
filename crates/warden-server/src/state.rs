//! Application state for the API server.

use std::sync::Arc;

use warden_core::{Classifier, ConfigError, WardenConfig};

use crate::history::History;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Classification pipeline, immutable after startup.
    pub classifier: Arc<Classifier>,
    /// Recent results for `/history` and `/analytics`.
    pub history: Arc<History>,
}

impl AppState {
    /// Creates application state around an existing classifier.
    pub fn new(classifier: Classifier, history_capacity: usize) -> Self {
        Self {
            classifier: Arc::new(classifier),
            history: Arc::new(History::new(history_capacity)),
        }
    }

    /// Creates application state with the default provider chains.
    pub fn from_config(
        config: &WardenConfig,
        history_capacity: usize,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(Classifier::from_config(config)?, history_capacity))
    }
}
