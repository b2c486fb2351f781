use tracing::{debug, info};

use super::{
    dto::{Location, Restaurant},
    keywords,
    provider::{PlaceDocument, PlaceQuery, PlacesProvider},
};
use crate::error::{AppError, AppResult};

pub const PAGE_SIZE: u32 = 10;
/// Kakao category group for restaurants.
pub const FOOD_CATEGORY: &str = "FD6";
pub const SEARCH_RADIUS_M: u32 = 2000;
pub const FALLBACK_QUERY: &str = "맛집";
pub const UNKNOWN_DISTANCE: &str = "알 수 없음";
const TIER1_KEYWORDS: usize = 2;

/// Query with the fixed filters, plus geo filters when both coordinates are given.
pub fn base_query(location: Option<Location>) -> PlaceQuery {
    let mut q = PlaceQuery {
        query: String::new(),
        size: PAGE_SIZE,
        category_group_code: FOOD_CATEGORY,
        x: None,
        y: None,
        radius: None,
        sort: None,
    };
    if let Some(Location {
        latitude: Some(lat),
        longitude: Some(lng),
    }) = location
    {
        q.x = Some(lng.to_string());
        q.y = Some(lat.to_string());
        q.radius = Some(SEARCH_RADIUS_M);
        q.sort = Some("distance");
    }
    q
}

pub fn tier1_query(keywords: &[&str]) -> String {
    if keywords.is_empty() {
        FALLBACK_QUERY.to_string()
    } else {
        keywords[..keywords.len().min(TIER1_KEYWORDS)].join(" ")
    }
}

pub fn to_restaurant(doc: PlaceDocument) -> Restaurant {
    let distance = match doc.distance.as_deref() {
        Some(d) if !d.is_empty() => format!("{d}m"),
        _ => UNKNOWN_DISTANCE.to_string(),
    };
    Restaurant {
        id: doc.id,
        name: doc.place_name,
        category: doc.category_name,
        address: doc.address_name,
        phone: doc.phone,
        distance,
        url: doc.place_url,
        x: doc.x,
        y: doc.y,
    }
}

/// Expand `answers` into keywords and query the provider, retrying once with
/// the first keyword alone when a multi-keyword query finds nothing.
pub async fn search(
    provider: Option<&dyn PlacesProvider>,
    answers: &[String],
    location: Option<Location>,
) -> AppResult<Vec<Restaurant>> {
    let provider = provider
        .ok_or_else(|| AppError::Misconfigured("서버에 API 키가 설정되지 않았습니다.".into()))?;

    let keywords = keywords::expand(answers);
    let mut query = base_query(location);
    query.query = tier1_query(&keywords);

    let mut result = provider.search(&query).await?;
    debug!(query = %query.query, found = result.documents.len(), "tier 1 search");

    if result.documents.is_empty() && keywords.len() > 1 {
        query.query = keywords[0].to_string();
        result = provider.search(&query).await?;
        debug!(query = %query.query, found = result.documents.len(), "tier 2 search");
    }

    let restaurants: Vec<Restaurant> = result.documents.into_iter().map(to_restaurant).collect();
    info!(answers = ?answers, query = %query.query, count = restaurants.len(), "restaurant search");
    Ok(restaurants)
}
