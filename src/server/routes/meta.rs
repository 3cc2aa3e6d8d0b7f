use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct PublicConfig {
    pub mode: &'static str,
    pub payment_link: String,
    pub model: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/config", get(public_config))
}

pub async fn health() -> Json<Value> {
    Json(json!({"ok": true}))
}

pub async fn public_config(State(state): State<AppState>) -> Json<PublicConfig> {
    Json(PublicConfig {
        mode: state.config.mode.as_str(),
        payment_link: state.config.payment_link.clone(),
        model: state.config.model.clone(),
    })
}
