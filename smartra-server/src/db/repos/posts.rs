//! Community post repository

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::{DbError, User};
use crate::models::{NewPost, PostFilter, Window};

/// Post record from database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Post with its author for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: User,
}

const SELECT_JOINED: &str = r#"
    SELECT
        p.id, p.title, p.content, p.category, p.author_id, p.created_at,
        u.username AS author_username,
        u.email AS author_email,
        u.full_name AS author_full_name,
        u.created_at AS author_created_at
"#;

fn from_row(row: &PgRow) -> Result<PostWithAuthor, sqlx::Error> {
    let author_id: i64 = row.try_get("author_id")?;
    Ok(PostWithAuthor {
        post: Post {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            category: row.try_get("category")?,
            author_id,
            created_at: row.try_get("created_at")?,
        },
        author: User {
            id: author_id,
            username: row.try_get("author_username")?,
            email: row.try_get("author_email")?,
            full_name: row.try_get("author_full_name")?,
            created_at: row.try_get("author_created_at")?,
        },
    })
}

/// Post repository
pub struct PostRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a post and return it with its author.
    pub async fn create(&self, new: NewPost) -> Result<PostWithAuthor, DbError> {
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO posts (title, content, category, author_id)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            {SELECT_JOINED}
            FROM inserted p
            JOIN users u ON u.id = p.author_id
            "#
        );

        let row = sqlx::query(&sql)
            .bind(&new.title)
            .bind(&new.content)
            .bind(&new.category)
            .bind(new.author_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| DbError::from_author_insert(e, new.author_id))?;

        Ok(from_row(&row)?)
    }

    pub async fn get(&self, id: i64) -> Result<PostWithAuthor, DbError> {
        let sql = format!(
            r#"
            {SELECT_JOINED}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "post",
                id: id.to_string(),
            })?;

        Ok(from_row(&row)?)
    }

    /// List posts newest first, optionally by category.
    pub async fn list(
        &self,
        filter: PostFilter,
        window: Window,
    ) -> Result<Vec<PostWithAuthor>, DbError> {
        let sql = format!(
            r#"
            {SELECT_JOINED}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE ($1::text IS NULL OR p.category = $1)
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(filter.category)
            .bind(window.limit)
            .bind(window.skip)
            .fetch_all(self.pool)
            .await?;

        let posts = rows.iter().map(from_row).collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }
}
