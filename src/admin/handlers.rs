use axum::{extract::State, middleware, routing::get, Json, Router};
use serde::Serialize;
use tracing::{info, instrument};

use super::services::{self, AdminUserView};
use crate::{auth::guard::require_admin, error::AppResult, state::AppState};

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub users: Vec<AdminUserView>,
}

/// Every route here sits behind the admin role guard.
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<UserListResponse>> {
    let users = services::list_users(&state.db).await?;
    info!(count = users.len(), "admin listed users");
    Ok(Json(UserListResponse {
        success: true,
        users,
    }))
}
