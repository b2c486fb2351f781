use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{HealthResponse, SearchRequest, SearchResponse},
    services,
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route("/restaurant/search", post(search_restaurants))
        .route("/restaurant/health", get(health))
}

/// The body is decoded as JSON whatever its `Content-Type`.
#[instrument(skip(state, body))]
pub async fn search_restaurants(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<SearchResponse>> {
    let payload: SearchRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::invalid_json(&e))?;
    let restaurants =
        services::search(state.places.as_deref(), &payload.answers, payload.location).await?;
    Ok(Json(SearchResponse {
        success: true,
        restaurants,
    }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "healthy",
        message: "맛집 검색 API가 정상 작동 중입니다.",
    })
}
