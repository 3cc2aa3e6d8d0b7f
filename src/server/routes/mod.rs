pub mod cards;
pub mod meta;
pub mod premium;

use axum::body::Bytes;
use axum::Router;
use serde::de::DeserializeOwned;

use crate::server::state::AppState;
use crate::utils::error::{Result, TarotError};

pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/premium", premium::router())
        .merge(cards::router())
        .merge(meta::router())
}

/// JSON body with every field defaulted; an empty body reads as `{}`.
pub(crate) fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| TarotError::invalid_request(format!("malformed JSON body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ReadingRequest;

    #[test]
    fn test_parse_body_defaults() {
        let request: ReadingRequest = parse_body(&Bytes::from_static(b"")).unwrap();
        assert!(request.cards.is_empty());

        let request: ReadingRequest = parse_body(&Bytes::from_static(b" \n")).unwrap();
        assert!(!request.consent);
    }

    #[test]
    fn test_parse_body_rejects_garbage() {
        let err = parse_body::<ReadingRequest>(&Bytes::from_static(b"{cards:")).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
