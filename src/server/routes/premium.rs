use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

use super::parse_body;
use crate::domain::model::{FeedbackRequest, Interpretation, ReadingRequest};
use crate::server::error::ApiError;
use crate::server::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/interpret",
            post(interpret).fallback(|| async {
                (
                    StatusCode::METHOD_NOT_ALLOWED,
                    Json(json!({"error": "Method not allowed"})),
                )
            }),
        )
        .route(
            "/feedback",
            post(feedback).fallback(|| async {
                (StatusCode::METHOD_NOT_ALLOWED, Json(json!({"ok": false})))
            }),
        )
}

pub async fn interpret(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Interpretation>, ApiError> {
    let production = state.config.production;
    let request: ReadingRequest =
        parse_body(&body).map_err(|e| ApiError::new(e, production))?;

    tracing::info!(
        "🔮 Interpretation requested: {} card(s), lang {}, consent {}",
        request.cards.len(),
        request.lang,
        request.consent
    );

    let interpretation = state
        .orchestrator
        .interpret(&request)
        .await
        .map_err(|e| ApiError::new(e, production))?;

    Ok(Json(interpretation))
}

/// Always answers `{ok: true}`; an unreadable body is logged as a down-vote.
pub async fn feedback(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    let request: FeedbackRequest = parse_body(&body).unwrap_or_else(|e| {
        tracing::debug!("Feedback body not understood, using defaults: {}", e);
        FeedbackRequest::default()
    });
    state.orchestrator.record_feedback(&request).await;
    Json(json!({"ok": true}))
}
