use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Location {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

/// A place reshaped for the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub category: String,
    pub address: String,
    pub phone: String,
    pub distance: String,
    pub url: String,
    pub x: String,
    pub y: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub restaurants: Vec<Restaurant>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
    pub message: &'static str,
}
