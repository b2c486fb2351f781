use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::{
    dto::{LoginRequest, PublicUser, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo_types::{Role, User},
};
use crate::{
    config::AdminSeed,
    error::{AppError, AppResult},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// `Some` only for values that are present and not blank.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register(db: &SqlitePool, req: RegisterRequest) -> AppResult<PublicUser> {
    let (Some(username), Some(email), Some(password)) = (
        present(req.username),
        present(req.email),
        present(req.password),
    ) else {
        return Err(AppError::validation("모든 필드를 입력해주세요."));
    };
    let username = username.trim();
    let email = normalize_email(&email);

    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::validation("올바른 이메일 형식이 아닙니다."));
    }

    // The UNIQUE constraints still reject concurrent duplicates.
    if User::find_by_username(db, username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(AppError::conflict("이미 존재하는 사용자 이름입니다."));
    }
    if User::find_by_email(db, &email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::conflict("이미 존재하는 이메일입니다."));
    }

    let hash = hash_password(&password)?;
    let user = User::create(db, username, &email, &hash, Role::User).await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user.into())
}

/// Check credentials and issue an access token.
pub async fn login(
    db: &SqlitePool,
    keys: &JwtKeys,
    req: LoginRequest,
) -> AppResult<(String, PublicUser)> {
    let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
        return Err(AppError::validation("이메일과 비밀번호를 모두 입력해주세요."));
    };
    let email = normalize_email(&email);

    let invalid = || AppError::Unauthorized("이메일 또는 비밀번호가 올바르지 않습니다.".into());

    let Some(user) = User::find_by_email(db, &email).await? else {
        warn!(%email, "login unknown email");
        return Err(invalid());
    };

    if !verify_password(&user.password_hash, &password)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(invalid());
    }

    let token = keys.sign(user.id, user.role)?;
    info!(user_id = user.id, role = %user.role, "user logged in");
    Ok((token, user.into()))
}

pub async fn current_user(db: &SqlitePool, user_id: i64) -> AppResult<PublicUser> {
    User::find_by_id(db, user_id)
        .await?
        .map(PublicUser::from)
        .ok_or_else(|| AppError::Unauthorized("사용자를 찾을 수 없습니다.".into()))
}

/// Create the configured admin account unless its email is already registered.
pub async fn seed_admin(db: &SqlitePool, seed: &AdminSeed) -> anyhow::Result<()> {
    let email = normalize_email(&seed.email);
    if let Some(existing) = User::find_by_email(db, &email).await? {
        if existing.role != Role::Admin {
            warn!(user_id = existing.id, %email, "admin seed email belongs to a non-admin user");
        }
        return Ok(());
    }

    let hash = hash_password(&seed.password)?;
    match User::create(db, seed.username.trim(), &email, &hash, Role::Admin).await {
        Ok(admin) => {
            info!(user_id = admin.id, username = %admin.username, "admin account seeded");
            Ok(())
        }
        Err(AppError::Conflict(_)) => {
            warn!(username = %seed.username, "admin seed username already taken; skipping");
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("seed admin: {e}")),
    }
}
