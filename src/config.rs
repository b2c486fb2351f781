use anyhow::{bail, Context};
use serde::Deserialize;

pub const DEFAULT_KAKAO_API_URL: &str = "https://dapi.kakao.com/v2/local/search/keyword.json";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KakaoConfig {
    /// Missing key is reported at search time, not at startup.
    pub api_key: Option<String>,
    pub api_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub kakao: KakaoConfig,
    pub static_dir: String,
    pub admin_seed: Option<AdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` reads the process environment.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = var("DATABASE_URL").unwrap_or_else(|| "sqlite://app.db".into());
        let jwt = JwtConfig {
            secret: var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: var("JWT_ISSUER").unwrap_or_else(|| "matmap".into()),
            audience: var("JWT_AUDIENCE").unwrap_or_else(|| "matmap-users".into()),
        };

        let timeout_secs = match var("KAKAO_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("KAKAO_TIMEOUT_SECS is not a number: {raw:?}"))?,
            None => 5,
        };
        if timeout_secs == 0 {
            bail!("KAKAO_TIMEOUT_SECS must be at least 1");
        }
        let kakao = KakaoConfig {
            api_key: var("KAKAO_REST_API_KEY").filter(|k| !k.trim().is_empty()),
            api_url: var("KAKAO_API_URL").unwrap_or_else(|| DEFAULT_KAKAO_API_URL.into()),
            timeout_secs,
        };
        let static_dir = var("STATIC_DIR").unwrap_or_else(|| "static".into());

        Ok(Self {
            database_url,
            jwt,
            kakao,
            static_dir,
            admin_seed: admin_seed(&var)?,
        })
    }
}

/// Seeding is off when no `ADMIN_*` variable is set, and all three must be
/// non-blank once any of them is.
fn admin_seed(var: &impl Fn(&str) -> Option<String>) -> anyhow::Result<Option<AdminSeed>> {
    let keys = ["ADMIN_USERNAME", "ADMIN_EMAIL", "ADMIN_PASSWORD"];
    let values = keys.map(|key| var(key));
    if values.iter().all(Option::is_none) {
        return Ok(None);
    }

    let missing: Vec<&str> = keys
        .iter()
        .zip(&values)
        .filter(|(_, v)| v.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(k, _)| *k)
        .collect();
    if !missing.is_empty() {
        bail!("admin seeding needs non-empty {}", missing.join(", "));
    }

    let [username, email, password] = values.map(Option::unwrap_or_default);
    Ok(Some(AdminSeed {
        username,
        email,
        password,
    }))
}
