use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::warn;

use crate::{
    auth::{jwt::JwtKeys, services::seed_admin},
    config::AppConfig,
    db,
    restaurants::provider::{KakaoClient, PlacesProvider},
};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    /// `None` when no provider API key is configured.
    pub places: Option<Arc<dyn PlacesProvider>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = db::connect(&config.database_url).await?;
        db::migrate(&db).await?;

        if let Some(seed) = &config.admin_seed {
            seed_admin(&db, seed).await?;
        }

        let places = KakaoClient::from_config(&config.kakao)?
            .map(|client| Arc::new(client) as Arc<dyn PlacesProvider>);
        if places.is_none() {
            warn!("KAKAO_REST_API_KEY is not set; restaurant search will fail");
        }

        Ok(Self::from_parts(db, config, places))
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        places: Option<Arc<dyn PlacesProvider>>,
    ) -> Self {
        let jwt = JwtKeys::from_config(&config.jwt);
        Self {
            db,
            config,
            jwt,
            places,
        }
    }

    /// In-memory database and test keys; `places` stands in for the provider.
    #[cfg(test)]
    pub async fn fake(places: Option<Arc<dyn PlacesProvider>>) -> Self {
        use crate::config::{JwtConfig, KakaoConfig};

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
            },
            kakao: KakaoConfig {
                api_key: None,
                api_url: crate::config::DEFAULT_KAKAO_API_URL.into(),
                timeout_secs: 1,
            },
            static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").into(),
            admin_seed: None,
        });
        Self::from_parts(db::test_pool().await, config, places)
    }
}
