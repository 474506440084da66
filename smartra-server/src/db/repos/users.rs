//! User repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::DbError;
use crate::models::{NewUser, Window};

/// User record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register a user. Duplicate username or email yields `DbError::Conflict`.
    pub async fn create(&self, user: NewUser) -> Result<User, DbError> {
        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, full_name)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, full_name, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<User, DbError> {
        sqlx::query_as(
            r#"
            SELECT id, username, email, full_name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "user",
            id: id.to_string(),
        })
    }

    /// List users in registration order.
    pub async fn list(&self, window: Window) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as(
            r#"
            SELECT id, username, email, full_name, created_at
            FROM users
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(window.limit)
        .bind(window.skip)
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support::{pool, unique_user};

    // Run with: DATABASE_URL=... cargo test -p smartra-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_get() {
        let pool = pool().await;
        let repo = UserRepo::new(&pool);

        let new_user = unique_user("get");
        let created = repo.create(new_user.clone()).await.unwrap();
        assert_eq!(created.username, new_user.username);

        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_username_conflicts() {
        let pool = pool().await;
        let repo = UserRepo::new(&pool);

        let user = unique_user("dup");
        repo.create(user.clone()).await.unwrap();

        let mut again = unique_user("dup");
        again.username = user.username;
        let err = repo.create(again).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_user_is_not_found() {
        let pool = pool().await;
        let err = UserRepo::new(&pool).get(i64::MAX).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "user", .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn list_respects_limit() {
        let pool = pool().await;
        let repo = UserRepo::new(&pool);
        repo.create(unique_user("list-a")).await.unwrap();
        repo.create(unique_user("list-b")).await.unwrap();

        let users = repo.list(Window::new(0, 1)).await.unwrap();
        assert_eq!(users.len(), 1);
    }
}
