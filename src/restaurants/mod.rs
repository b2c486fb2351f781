mod dto;
pub mod handlers;
pub mod keywords;
pub mod provider;
mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::restaurant_routes()
}
