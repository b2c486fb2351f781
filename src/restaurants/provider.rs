use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{config::KakaoConfig, error::AppError};

/// Query parameters sent to the places provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceQuery {
    pub query: String,
    pub size: u32,
    pub category_group_code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<&'static str>,
}

/// One place as the provider returns it. Absent fields decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaceDocument {
    pub id: String,
    pub place_name: String,
    pub category_name: String,
    pub address_name: String,
    pub phone: String,
    pub distance: Option<String>,
    pub place_url: String,
    pub x: String,
    pub y: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaceSearchResponse {
    pub documents: Vec<PlaceDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProviderErrorBody {
    message: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Non-2xx answer; `message` comes from the provider's error body when it had one.
    #[error("provider returned {status}")]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Status { status, message } => AppError::Upstream {
                status,
                message: message.unwrap_or_else(|| "알 수 없는 API 오류".into()),
            },
            ProviderError::Transport(e) => {
                AppError::Internal(anyhow::Error::new(e).context("places provider request"))
            }
        }
    }
}

#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn search(&self, query: &PlaceQuery) -> Result<PlaceSearchResponse, ProviderError>;
}

/// Kakao Local keyword search.
#[derive(Clone)]
pub struct KakaoClient {
    http: reqwest::Client,
    url: String,
    auth_header: String,
}

impl KakaoClient {
    pub fn new(api_key: &str, url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            url: url.to_string(),
            auth_header: format!("KakaoAK {api_key}"),
        })
    }

    /// `None` when no API key is configured.
    pub fn from_config(cfg: &KakaoConfig) -> anyhow::Result<Option<Self>> {
        cfg.api_key
            .as_deref()
            .map(|key| Self::new(key, &cfg.api_url, Duration::from_secs(cfg.timeout_secs)))
            .transpose()
    }
}

#[async_trait]
impl PlacesProvider for KakaoClient {
    async fn search(&self, query: &PlaceQuery) -> Result<PlaceSearchResponse, ProviderError> {
        debug!(?query, "kakao keyword search");
        let res = self
            .http
            .get(&self.url)
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .query(query)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let message = res
                .json::<ProviderErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message);
            warn!(%status, ?message, "kakao search failed");
            return Err(ProviderError::Status { status, message });
        }

        Ok(res.json::<PlaceSearchResponse>().await?)
    }
}


#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::HeaderMap,
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::json;

    use super::*;

    type Seen = Arc<Mutex<Vec<(Option<String>, std::collections::HashMap<String, String>)>>>;

    /// Local stand-in for the Kakao endpoint. Answers 400 when `query` is "bad".
    async fn spawn_kakao() -> (String, Seen) {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .route(
                "/v2/local/search/keyword.json",
                get(
                    |State(seen): State<Seen>,
                     headers: HeaderMap,
                     Query(params): Query<std::collections::HashMap<String, String>>| async move {
                        let auth = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        let bad = params.get("query").map(String::as_str) == Some("bad");
                        seen.lock().unwrap().push((auth, params));
                        if bad {
                            return (
                                StatusCode::BAD_REQUEST,
                                Json(json!({"errorType": "InvalidArgument", "message": "query is invalid"})),
                            );
                        }
                        (
                            StatusCode::OK,
                            Json(json!({
                                "documents": [{
                                    "id": "26338954",
                                    "place_name": "교촌치킨",
                                    "category_name": "음식점 > 치킨",
                                    "address_name": "서울 강남구",
                                    "phone": "",
                                    "distance": "418",
                                    "place_url": "http://place.map.kakao.com/26338954",
                                    "x": "127.05",
                                    "y": "37.50",
                                    "road_address_name": "ignored"
                                }],
                                "meta": {"total_count": 1}
                            })),
                        )
                    },
                ),
            )
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v2/local/search/keyword.json"), seen)
    }

    fn query(q: &str) -> PlaceQuery {
        PlaceQuery {
            query: q.into(),
            size: 10,
            category_group_code: "FD6",
            x: None,
            y: None,
            radius: None,
            sort: None,
        }
    }

    #[tokio::test]
    async fn sends_key_and_params_and_decodes_documents() {
        let (url, seen) = spawn_kakao().await;
        let client = KakaoClient::new("secret-key", &url, Duration::from_secs(5)).unwrap();

        let res = client
            .search(&PlaceQuery {
                x: Some("127".into()),
                y: Some("37.5".into()),
                radius: Some(2000),
                sort: Some("distance"),
                ..query("치킨")
            })
            .await
            .unwrap();
        assert_eq!(res.documents.len(), 1);
        assert_eq!(res.documents[0].place_name, "교촌치킨");
        assert_eq!(res.documents[0].distance.as_deref(), Some("418"));

        let seen = seen.lock().unwrap();
        let (auth, params) = &seen[0];
        assert_eq!(auth.as_deref(), Some("KakaoAK secret-key"));
        assert_eq!(params["query"], "치킨");
        assert_eq!(params["size"], "10");
        assert_eq!(params["category_group_code"], "FD6");
        assert_eq!(params["radius"], "2000");
        assert_eq!(params["sort"], "distance");
        assert_eq!(params["x"], "127");
        assert_eq!(params["y"], "37.5");
    }

    #[tokio::test]
    async fn omits_geo_params_without_location() {
        let (url, seen) = spawn_kakao().await;
        let client = KakaoClient::new("k", &url, Duration::from_secs(5)).unwrap();
        client.search(&query("맛집")).await.unwrap();

        let seen = seen.lock().unwrap();
        let params = &seen[0].1;
        for key in ["x", "y", "radius", "sort"] {
            assert!(!params.contains_key(key), "{key} should be absent");
        }
    }

    #[tokio::test]
    async fn error_status_carries_provider_message() {
        let (url, _) = spawn_kakao().await;
        let client = KakaoClient::new("k", &url, Duration::from_secs(5)).unwrap();

        let err = client.search(&query("bad")).await.unwrap_err();
        match err {
            ProviderError::Status { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message.as_deref(), Some("query is invalid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Stand-in that answers only after `delay`.
    async fn spawn_slow_kakao(delay: Duration) -> String {
        let app = Router::new().route(
            "/v2/local/search/keyword.json",
            get(move || async move {
                tokio::time::sleep(delay).await;
                Json(json!({"documents": []}))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v2/local/search/keyword.json")
    }

    #[tokio::test]
    async fn timeout_becomes_generic_server_error() {
        let url = spawn_slow_kakao(Duration::from_secs(5)).await;
        let client = KakaoClient::new("k", &url, Duration::from_millis(100)).unwrap();

        let err = client.search(&query("맛집")).await.unwrap_err();
        match &err {
            ProviderError::Transport(e) => assert!(e.is_timeout(), "{e}"),
            other => panic!("unexpected error: {other:?}"),
        }

        let res = AppError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "서버 오류가 발생했습니다.");
    }

    #[test]
    fn status_error_maps_to_upstream() {
        let err: AppError = ProviderError::Status {
            status: StatusCode::UNAUTHORIZED,
            message: None,
        }
        .into();
        match err {
            AppError::Upstream { status, message } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(message, "알 수 없는 API 오류");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_key_builds_no_client() {
        let cfg = KakaoConfig {
            api_key: None,
            api_url: "http://localhost".into(),
            timeout_secs: 1,
        };
        assert!(KakaoClient::from_config(&cfg).unwrap().is_none());
    }

    #[test]
    fn document_tolerates_missing_fields() {
        let doc: PlaceDocument = serde_json::from_value(json!({"id": "1"})).unwrap();
        assert_eq!(doc.id, "1");
        assert_eq!(doc.distance, None);
        assert!(doc.place_name.is_empty());
    }
}
