use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::{extractors::AuthUser, repo_types::Role};
use crate::error::AppError;

/// Reject `user` unless it holds `role`.
pub fn authorize(user: &AuthUser, role: Role) -> Result<(), AppError> {
    if user.role == role {
        return Ok(());
    }
    warn!(user_id = user.id, have = %user.role, need = %role, "role check failed");
    Err(AppError::Forbidden(format!("{} 권한이 필요합니다.", role.label())))
}

/// Route layer for admin-only routers:
/// `router.route_layer(middleware::from_fn_with_state(state, require_admin))`.
///
/// Token problems are rejected by the `AuthUser` extractor before this runs.
pub async fn require_admin(
    user: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&user, Role::Admin)?;
    Ok(next.run(request).await)
}
