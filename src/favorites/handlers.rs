use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{AddFavoriteRequest, AddFavoriteResponse, FavoriteListResponse},
    services,
};
use crate::{auth::extractors::AuthUser, error::AppResult, state::AppState};

pub fn favorite_routes() -> Router<AppState> {
    Router::new().route("/favorites", get(list_favorites).post(add_favorite))
}

#[instrument(skip(state, payload))]
pub async fn add_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<AddFavoriteRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AddFavoriteResponse>)> {
    let Json(payload) = payload?;
    let favorite = services::add(&state.db, auth.id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(AddFavoriteResponse {
            success: true,
            message: "맛집을 찜했습니다.".into(),
            favorite,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<FavoriteListResponse>> {
    let favorites = services::list(&state.db, auth.id).await?;
    Ok(Json(FavoriteListResponse {
        success: true,
        favorites,
    }))
}
