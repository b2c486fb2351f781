use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Saved restaurant owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub restaurant_id: String, // provider place id
    pub restaurant_name: String,
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Validated input for a new favorite.
#[derive(Debug, Clone, Default)]
pub struct NewFavorite {
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
}
