use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use pitch_search::SearchResponse;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::validate::parse_search_body;
use crate::AppState;

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "timestamp": Utc::now().to_rfc3339() }))
}

pub async fn search(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    // Malformed or missing JSON reads as a missing brief.
    let body = body.map(|Json(value)| value).unwrap_or(Value::Null);
    let request = parse_search_body(&body)?;

    info!(
        outlet_types = request.outlet_types.len(),
        geography = request.geography.len(),
        refinements = request.refinements.len(),
        "search request"
    );

    let response = state.search.search(&request).await?;
    Ok(Json(response))
}
