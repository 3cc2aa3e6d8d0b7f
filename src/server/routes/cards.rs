use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::parse_body;
use crate::core::draw::{DrawEngine, DrawOptions};
use crate::core::reading::{compose, disclaimer, Reading};
use crate::domain::catalog::Catalog;
use crate::domain::model::{lenient, Card, Draw, DrawnCard, Language, Spread, SpreadSize};
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::utils::error;

const DEFAULT_DRAW_COUNT: usize = 3;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DrawBody {
    #[serde(deserialize_with = "lenient")]
    pub count: Option<usize>,
    #[serde(deserialize_with = "lenient")]
    pub lang: Language,
    /// Overrides the configured reversal setting for this draw
    #[serde(deserialize_with = "lenient")]
    pub reversals: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct DrawResponse {
    pub spread: SpreadSize,
    pub header: &'static str,
    pub labels: Vec<String>,
    pub cards: Vec<DrawnCard>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CardRef {
    pub index: usize,
    #[serde(default)]
    pub reversed: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReadingBody {
    pub cards: Vec<CardRef>,
    #[serde(deserialize_with = "lenient")]
    pub question: String,
    #[serde(deserialize_with = "lenient")]
    pub lang: Language,
}

#[derive(Debug, Serialize)]
pub struct ReadingResponse {
    #[serde(flatten)]
    pub reading: Reading,
    pub disclaimer: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub count: usize,
    pub cards: Vec<Card>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/draw", post(draw))
        .route("/reading", post(reading))
        .route("/catalog", get(catalog))
}

pub async fn draw(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DrawResponse>, ApiError> {
    let production = state.config.production;
    let body: DrawBody = parse_body(&body).map_err(|e| ApiError::new(e, production))?;

    let size = SpreadSize::clamp(body.count.unwrap_or(DEFAULT_DRAW_COUNT));
    let options = DrawOptions {
        reversals: body.reversals.unwrap_or(state.config.reversals),
    };
    let spread = DrawEngine::from_entropy(state.catalog.clone(), options)
        .spread(size)
        .map_err(|e| ApiError::new(e, production))?;

    Ok(Json(DrawResponse {
        spread: size,
        header: size.header(body.lang),
        labels: spread
            .positions(body.lang)
            .into_iter()
            .map(|(label, _)| label)
            .collect(),
        cards: spread.draw().cards().to_vec(),
    }))
}

/// Lays client-chosen cards on the largest spread they fill.
fn spread_from_refs(catalog: &Catalog, refs: &[CardRef]) -> error::Result<Option<Spread>> {
    if refs.is_empty() {
        return Ok(None);
    }
    let size = SpreadSize::clamp(refs.len());
    let picks: Vec<(usize, bool)> = refs
        .iter()
        .take(size.count())
        .map(|card_ref| (card_ref.index, card_ref.reversed))
        .collect();

    let draw = Draw::from_catalog_indices(catalog, &picks)?;
    Ok(Some(Spread::new(size, draw)?))
}

pub async fn reading(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ReadingResponse>, ApiError> {
    let production = state.config.production;
    let body: ReadingBody = parse_body(&body).map_err(|e| ApiError::new(e, production))?;
    let spread =
        spread_from_refs(&state.catalog, &body.cards).map_err(|e| ApiError::new(e, production))?;

    Ok(Json(ReadingResponse {
        reading: compose(spread.as_ref(), &body.question, body.lang),
        disclaimer: disclaimer(body.lang),
    }))
}

pub async fn catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        count: state.catalog.len(),
        cards: state.catalog.cards().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(indices: &[usize]) -> Vec<CardRef> {
        indices
            .iter()
            .map(|&index| CardRef {
                index,
                reversed: false,
            })
            .collect()
    }

    #[test]
    fn test_spread_from_refs_truncates_to_spread() {
        let catalog = Catalog::major_arcana();
        let spread = spread_from_refs(&catalog, &refs(&[0, 1, 2, 3])).unwrap().unwrap();
        assert_eq!(spread.size(), SpreadSize::Three);
        assert_eq!(spread.draw().len(), 3);
    }

    #[test]
    fn test_bodies_tolerate_null_fields() {
        let body: ReadingBody =
            serde_json::from_str(r#"{"cards": [{"index": 1}], "question": null, "lang": null}"#)
                .unwrap();
        assert_eq!(body.cards.len(), 1);
        assert_eq!(body.question, "");
        assert_eq!(body.lang, Language::Fr);

        let body: DrawBody = serde_json::from_str(r#"{"count": null, "reversals": null}"#).unwrap();
        assert!(body.count.is_none());
        assert!(body.reversals.is_none());
    }

    #[test]
    fn test_spread_from_refs_rejects_bad_input() {
        let catalog = Catalog::major_arcana();
        assert!(spread_from_refs(&catalog, &refs(&[22])).is_err());
        assert!(spread_from_refs(&catalog, &refs(&[4, 4, 5])).is_err());
        assert!(spread_from_refs(&catalog, &[]).unwrap().is_none());
    }
}
