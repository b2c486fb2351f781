use serde::Serialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::{
    auth::repo_types::{Role, User},
    error::AppResult,
};

/// A user as shown in the admin listing.
#[derive(Debug, Serialize)]
pub struct AdminUserView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for AdminUserView {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

pub async fn list_users(db: &SqlitePool) -> AppResult<Vec<AdminUserView>> {
    let users = User::list_all(db).await?;
    Ok(users.into_iter().map(AdminUserView::from).collect())
}
