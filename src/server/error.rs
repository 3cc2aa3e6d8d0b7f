use crate::adapters::openai::DETAIL_LIMIT;
use crate::utils::error::{ErrorCategory, TarotError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Handler error. Carries the production flag so 5xx bodies know whether
/// to include the detail.
#[derive(Debug)]
pub struct ApiError {
    error: TarotError,
    production: bool,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl ApiError {
    pub fn new(error: TarotError, production: bool) -> Self {
        Self { error, production }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn body(&self) -> ErrorBody {
        match self.error.category() {
            ErrorCategory::Client | ErrorCategory::Configuration => ErrorBody {
                error: self.error.to_string(),
                detail: None,
            },
            category => ErrorBody {
                error: match category {
                    ErrorCategory::Upstream => "AI request failed (Responses)".to_string(),
                    _ => self.error.user_friendly_message(),
                },
                detail: (!self.production)
                    .then(|| self.error.to_string().chars().take(DETAIL_LIMIT).collect()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(
                "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
                self.error,
                self.error.category(),
                self.error.severity()
            );
        } else {
            tracing::debug!("Rejected request: {}", self.error);
        }
        (status, Json(self.body())).into_response()
    }
}
