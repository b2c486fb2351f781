use serde::{Deserialize, Serialize};

use super::repo_types::Favorite;

#[derive(Debug, Default, Deserialize)]
pub struct AddFavoriteRequest {
    pub restaurant_id: Option<String>,
    pub restaurant_name: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddFavoriteResponse {
    pub success: bool,
    pub message: String,
    pub favorite: Favorite,
}

#[derive(Debug, Serialize)]
pub struct FavoriteListResponse {
    pub success: bool,
    pub favorites: Vec<Favorite>,
}
