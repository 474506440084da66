//! Schema setup
//!
//! Every statement is idempotent so `run` is safe on each startup.

use sqlx::PgPool;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        full_name TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS patterns (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        difficulty TEXT NOT NULL,
        category TEXT NOT NULL,
        yarn_weight TEXT,
        needle_size TEXT,
        estimated_time TEXT,
        image_url TEXT,
        pattern_file_url TEXT,
        author_id BIGINT NOT NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        is_public BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        category TEXT NOT NULL,
        author_id BIGINT NOT NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_patterns_title ON patterns(title)",
    "CREATE INDEX IF NOT EXISTS idx_patterns_difficulty ON patterns(difficulty)",
    "CREATE INDEX IF NOT EXISTS idx_patterns_category ON patterns(category)",
    "CREATE INDEX IF NOT EXISTS idx_posts_title ON posts(title)",
    "CREATE INDEX IF NOT EXISTS idx_posts_category ON posts(category)",
    "CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at DESC)",
];

/// Create tables and indexes if they do not exist.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running schema migrations...");

    let mut tx = pool.begin().await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!(statements = STATEMENTS.len(), "Schema ready");
    Ok(())
}
