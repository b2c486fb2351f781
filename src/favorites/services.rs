use sqlx::SqlitePool;
use tracing::info;

use super::{
    dto::AddFavoriteRequest,
    repo,
    repo_types::{Favorite, NewFavorite},
};
use crate::error::{AppError, AppResult};

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn add(db: &SqlitePool, user_id: i64, req: AddFavoriteRequest) -> AppResult<Favorite> {
    let (Some(restaurant_id), Some(restaurant_name)) =
        (required(req.restaurant_id), required(req.restaurant_name))
    else {
        return Err(AppError::validation("맛집 정보가 필요합니다."));
    };

    let new = NewFavorite {
        restaurant_id,
        restaurant_name,
        category: optional(req.category),
        address: optional(req.address),
        phone: optional(req.phone),
        url: optional(req.url),
    };
    let favorite = repo::insert(db, user_id, &new).await?;
    info!(user_id, restaurant_id = %favorite.restaurant_id, "favorite added");
    Ok(favorite)
}

pub async fn list(db: &SqlitePool, user_id: i64) -> AppResult<Vec<Favorite>> {
    Ok(repo::list_by_user(db, user_id).await?)
}
