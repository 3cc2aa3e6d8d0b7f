use crate::app::{build_orchestrator, AppOrchestrator};
use crate::config::AppConfig;
use crate::domain::catalog::Catalog;
use crate::utils::error::Result;
use std::sync::Arc;

/// Shared application state accessible from all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Card table, read-only after startup
    pub catalog: Arc<Catalog>,
    pub orchestrator: Arc<AppOrchestrator>,
}

impl AppState {
    pub fn new(config: AppConfig, orchestrator: AppOrchestrator) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Catalog::shared(),
            orchestrator: Arc::new(orchestrator),
        }
    }

    pub fn from_config(config: AppConfig) -> Result<Self> {
        let orchestrator = build_orchestrator(&config)?;
        Ok(Self::new(config, orchestrator))
    }
}
