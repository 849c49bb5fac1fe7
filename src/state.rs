//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::{config::Config, engine::ExecutionEngine};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// The execution engine (sandbox pool + pipeline)
    pub engine: ExecutionEngine,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                engine: ExecutionEngine::new(config.clone()),
                config,
            }),
        }
    }

    /// Get a reference to the execution engine
    pub fn engine(&self) -> &ExecutionEngine {
        &self.inner.engine
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
