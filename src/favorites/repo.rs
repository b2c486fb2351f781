use anyhow::Context;
use sqlx::SqlitePool;

use super::repo_types::{Favorite, NewFavorite};
use crate::{
    db::{is_foreign_key_violation, is_unique_violation},
    error::{AppError, AppResult},
};

/// Insert a favorite. The `(user_id, restaurant_id)` constraint turns a
/// duplicate into `AppError::Conflict`; a `user_id` with no account row is
/// `AppError::Unauthorized`.
pub async fn insert(db: &SqlitePool, user_id: i64, new: &NewFavorite) -> AppResult<Favorite> {
    sqlx::query_as::<_, Favorite>(
        r#"
        INSERT INTO favorites (user_id, restaurant_id, restaurant_name, category, address, phone, url)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id, user_id, restaurant_id, restaurant_name, category, address, phone, url, created_at
        "#,
    )
    .bind(user_id)
    .bind(&new.restaurant_id)
    .bind(&new.restaurant_name)
    .bind(&new.category)
    .bind(&new.address)
    .bind(&new.phone)
    .bind(&new.url)
    .fetch_one(db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::conflict("이미 찜한 맛집입니다.")
        } else if is_foreign_key_violation(&e) {
            AppError::Unauthorized("사용자를 찾을 수 없습니다.".into())
        } else {
            AppError::Internal(anyhow::Error::new(e).context("insert favorite"))
        }
    })
}

/// Favorites of `user_id`, newest first.
pub async fn list_by_user(db: &SqlitePool, user_id: i64) -> anyhow::Result<Vec<Favorite>> {
    let rows = sqlx::query_as::<_, Favorite>(
        r#"
        SELECT id, user_id, restaurant_id, restaurant_name, category, address, phone, url, created_at
          FROM favorites
         WHERE user_id = ?
         ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list favorites by user")?;
    Ok(rows)
}
