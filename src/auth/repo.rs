use anyhow::Context;
use sqlx::SqlitePool;

use crate::{
    auth::repo_types::{Role, User},
    db::is_unique_violation,
    error::{AppError, AppResult},
};

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at";

impl User {
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    pub async fn find_by_username(
        db: &SqlitePool,
        username: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(db)
        .await
        .context("find user by username")?;
        Ok(user)
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    /// All users in storage order.
    pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(db)
        .await
        .context("list users")?;
        Ok(users)
    }

    /// Insert a user whose password is already hashed.
    /// A taken username or email surfaces as `AppError::Conflict`.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES (?, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("이미 존재하는 사용자 이름 또는 이메일입니다.")
            } else {
                AppError::Internal(anyhow::Error::new(e).context("insert user"))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn create_then_find() {
        let db = test_pool().await;
        let user = User::create(&db, "kim", "kim@example.com", "hash", Role::User)
            .await
            .unwrap();
        assert_eq!(user.role, Role::User);

        let by_email = User::find_by_email(&db, "kim@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        let by_name = User::find_by_username(&db, "kim").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);
        let by_id = User::find_by_id(&db, user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "kim@example.com");
        assert!(User::find_by_email(&db, "nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_or_email_conflicts() {
        let db = test_pool().await;
        User::create(&db, "kim", "kim@example.com", "hash", Role::User)
            .await
            .unwrap();

        let same_email = User::create(&db, "lee", "kim@example.com", "hash", Role::User).await;
        assert!(matches!(same_email, Err(AppError::Conflict(_))));

        let same_name = User::create(&db, "kim", "lee@example.com", "hash", Role::User).await;
        assert!(matches!(same_name, Err(AppError::Conflict(_))));

        assert_eq!(User::list_all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_all_keeps_insertion_order_and_roles() {
        let db = test_pool().await;
        User::create(&db, "a", "a@example.com", "h", Role::Admin).await.unwrap();
        User::create(&db, "b", "b@example.com", "h", Role::User).await.unwrap();

        let users = User::list_all(&db).await.unwrap();
        let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(users[0].role, Role::Admin);
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            username: "kim".into(),
            email: "kim@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::User,
            created_at: time::OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"role\":\"user\""));
    }
}
