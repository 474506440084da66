//! Repository implementations for database access
//!
//! Each repository borrows the pool for the duration of a request:
//! - inserts return the stored row (`RETURNING`) joined with its author
//! - constraint violations are classified, not pre-checked

pub mod users;
pub mod patterns;
pub mod posts;

pub use users::{User, UserRepo};
pub use patterns::{Pattern, PatternRepo, PatternWithAuthor};
pub use posts::{Post, PostRepo, PostWithAuthor};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// Unique constraint rejected the write
    #[error("conflict on {constraint}")]
    Conflict { constraint: String },

    /// Foreign key points at a row that does not exist
    #[error("referenced {resource} '{id}' does not exist")]
    MissingReference { resource: &'static str, id: String },
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return Self::Conflict {
                    constraint: db_err.constraint().unwrap_or("unique key").to_owned(),
                };
            }
        }
        Self::Sqlx(e)
    }
}

impl DbError {
    /// Classify an insert error, turning an FK violation on `author_id`
    /// into [`DbError::MissingReference`].
    pub(crate) fn from_author_insert(e: sqlx::Error, author_id: i64) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_foreign_key_violation() {
                return Self::MissingReference {
                    resource: "user",
                    id: author_id.to_string(),
                };
            }
        }
        Self::from(e)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::PgPool;

    use crate::db::{create_pool, migrations};
    use crate::models::NewUser;

    /// Pool against `DATABASE_URL` with the schema applied.
    pub async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let database = smartra_core::DatabaseSection::default().with_url(url);
        let pool = create_pool(&database).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        pool
    }

    /// A user with a unique username/email so tests can share a database.
    pub fn unique_user(prefix: &str) -> NewUser {
        let tag = uuid::Uuid::new_v4().simple().to_string();
        NewUser {
            username: format!("{prefix}-{tag}"),
            email: format!("{prefix}-{tag}@example.com"),
            full_name: format!("{prefix} tester"),
        }
    }
}
