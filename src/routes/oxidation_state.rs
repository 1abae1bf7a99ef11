//! Oxidation State Relay
//!
//! `GET /api/oxidation-state?query=<formula>` forwards the term to the
//! Materials Project with the server-held key and relays the answer:
//!
//! | Situation                       | Status | Body                               |
//! |---------------------------------|--------|------------------------------------|
//! | missing / blank `query`         | 400    | `{"error": "Missing or invalid ..."}` |
//! | no API key configured           | 500    | `{"error": "API Key is missing ..."}` |
//! | upstream 2xx                    | 200    | upstream body, untouched           |
//! | upstream non-2xx                | 404    | `{"error": <upstream body>}`       |
//! | transport / decode failure      | 500    | `{"error": "Internal Server Error"}` |

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::models::{AppState, SearchParams};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/oxidation-state", get(get_oxidation_state))
        .with_state(state)
}

pub async fn get_oxidation_state(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<Value>> {
    let params = SearchParams::from_pairs(pairs);
    let term = params.term().ok_or(AppError::InvalidQuery)?;

    let api_key = state
        .config
        .materials
        .api_key
        .as_deref()
        .ok_or(AppError::MissingApiKey)?;

    let upstream = state.source.fetch(term, api_key).await?;

    if !upstream.success {
        warn!(status = upstream.status, query = %term, "Materials Project returned an error");
        return Err(AppError::Upstream(upstream.body));
    }

    info!(query = %term, "Relaying Materials Project response");
    Ok(Json(upstream.body))
}
