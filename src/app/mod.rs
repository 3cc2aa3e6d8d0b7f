//! Wiring: turns an `AppConfig` into the concrete orchestrator.

use crate::adapters::{JsonlJournal, ResponsesClient};
use crate::config::AppConfig;
use crate::core::Orchestrator;
use crate::domain::ports::{ConfigProvider, InterpretationClient};
use crate::utils::error::Result;
use std::sync::Arc;

pub type AppOrchestrator = Orchestrator<AppConfig, JsonlJournal>;

/// Responses client, only when an API key is configured.
pub fn build_client(config: &AppConfig) -> Result<Option<Arc<dyn InterpretationClient>>> {
    let Some(api_key) = config.api_key() else {
        return Ok(None);
    };
    let client = ResponsesClient::new(
        api_key,
        config.api_base.clone(),
        config.model.clone(),
        config.request_timeout(),
    )?;
    Ok(Some(Arc::new(client)))
}

pub fn build_orchestrator(config: &AppConfig) -> Result<AppOrchestrator> {
    let client = build_client(config)?;
    let journal = JsonlJournal::new(&config.data_dir);

    tracing::info!(
        "🔮 Interpretation mode: {} (model {}, credential {})",
        config.mode,
        config.model,
        if client.is_some() { "present" } else { "absent" }
    );

    Ok(Orchestrator::new(config.clone(), client, journal))
}
