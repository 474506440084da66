//! Pattern repository
//!
//! Every read returns the pattern joined with its author in one query.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::{DbError, User};
use crate::models::{NewPattern, PatternFilter, Window};

/// Pattern record from database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub category: String,
    pub yarn_weight: Option<String>,
    pub needle_size: Option<String>,
    pub estimated_time: Option<String>,
    pub image_url: Option<String>,
    pub pattern_file_url: Option<String>,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
}

/// Pattern with its author for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternWithAuthor {
    pub pattern: Pattern,
    pub author: User,
}

const SELECT_JOINED: &str = r#"
    SELECT
        p.id, p.title, p.description, p.difficulty, p.category,
        p.yarn_weight, p.needle_size, p.estimated_time,
        p.image_url, p.pattern_file_url, p.author_id, p.created_at, p.is_public,
        u.username AS author_username,
        u.email AS author_email,
        u.full_name AS author_full_name,
        u.created_at AS author_created_at
"#;

fn from_row(row: &PgRow) -> Result<PatternWithAuthor, sqlx::Error> {
    let author_id: i64 = row.try_get("author_id")?;
    Ok(PatternWithAuthor {
        pattern: Pattern {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            difficulty: row.try_get("difficulty")?,
            category: row.try_get("category")?,
            yarn_weight: row.try_get("yarn_weight")?,
            needle_size: row.try_get("needle_size")?,
            estimated_time: row.try_get("estimated_time")?,
            image_url: row.try_get("image_url")?,
            pattern_file_url: row.try_get("pattern_file_url")?,
            author_id,
            created_at: row.try_get("created_at")?,
            is_public: row.try_get("is_public")?,
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

/// Pattern repository
pub struct PatternRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PatternRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a pattern and return it with its author.
    ///
    /// An `author_id` with no user row yields `DbError::MissingReference`.
    pub async fn create(&self, new: NewPattern) -> Result<PatternWithAuthor, DbError> {
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO patterns (
                    title, description, difficulty, category,
                    yarn_weight, needle_size, estimated_time,
                    image_url, pattern_file_url, author_id
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
            )
            {SELECT_JOINED}
            FROM inserted p
            JOIN users u ON u.id = p.author_id
            "#
        );

        let row = sqlx::query(&sql)
            .bind(&new.title)
            .bind(&new.description)
            .bind(&new.difficulty)
            .bind(&new.category)
            .bind(&new.yarn_weight)
            .bind(&new.needle_size)
            .bind(&new.estimated_time)
            .bind(&new.image_url)
            .bind(&new.pattern_file_url)
            .bind(new.author_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| DbError::from_author_insert(e, new.author_id))?;

        Ok(from_row(&row)?)
    }

    /// Fetch by id, public or not.
    pub async fn get(&self, id: i64) -> Result<PatternWithAuthor, DbError> {
        let sql = format!(
            r#"
            {SELECT_JOINED}
            FROM patterns p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "pattern",
                id: id.to_string(),
            })?;

        Ok(from_row(&row)?)
    }

    /// List public patterns, optionally filtered by difficulty and category.
    pub async fn list(
        &self,
        filter: PatternFilter,
        window: Window,
    ) -> Result<Vec<PatternWithAuthor>, DbError> {
        let sql = format!(
            r#"
            {SELECT_JOINED}
            FROM patterns p
            JOIN users u ON u.id = p.author_id
            WHERE p.is_public
              AND ($1::text IS NULL OR p.difficulty = $1)
              AND ($2::text IS NULL OR p.category = $2)
            ORDER BY p.id
            LIMIT $3 OFFSET $4
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(filter.difficulty)
            .bind(filter.category)
            .bind(window.limit)
            .bind(window.skip)
            .fetch_all(self.pool)
            .await?;

        let patterns = rows.iter().map(from_row).collect::<Result<Vec<_>, _>>()?;
        Ok(patterns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support::{pool, unique_user};
    use crate::db::UserRepo;

    fn sample(author_id: i64, category: &str) -> NewPattern {
        NewPattern {
            title: "Ribbed beanie".into(),
            description: "2x2 rib, folded brim".into(),
            difficulty: "beginner".into(),
            category: category.into(),
            yarn_weight: Some("worsted".into()),
            author_id,
            ..NewPattern::default()
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_joins_author() {
        let pool = pool().await;
        let author = UserRepo::new(&pool).create(unique_user("pat")).await.unwrap();

        let created = PatternRepo::new(&pool)
            .create(sample(author.id, "hat"))
            .await
            .unwrap();

        assert_eq!(created.author, author);
        assert!(created.pattern.is_public);
        assert_eq!(created.pattern.needle_size, None);

        let fetched = PatternRepo::new(&pool).get(created.pattern.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn unknown_author_is_missing_reference() {
        let pool = pool().await;
        let err = PatternRepo::new(&pool)
            .create(sample(i64::MAX, "hat"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::MissingReference { resource: "user", .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn list_filters_by_category() {
        let pool = pool().await;
        let author = UserRepo::new(&pool).create(unique_user("filter")).await.unwrap();
        let category = format!("cat-{}", author.id);
        let repo = PatternRepo::new(&pool);
        repo.create(sample(author.id, &category)).await.unwrap();
        repo.create(sample(author.id, "other")).await.unwrap();

        let filter = PatternFilter {
            difficulty: None,
            category: Some(category.clone()),
        };
        let listed = repo.list(filter, Window::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].pattern.category, category);
    }
}
