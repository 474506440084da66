//! Postgres pool built from the `[database]` config section

use std::time::Duration;

use smartra_core::DatabaseSection;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Pool settings for a database section, without connecting.
pub fn pool_options(database: &DatabaseSection) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(database.max_connections.max(1))
        .acquire_timeout(Duration::from_secs(database.acquire_timeout_secs))
}

/// Connect eagerly so a bad URL fails at startup rather than on the first
/// request.
pub async fn create_pool(database: &DatabaseSection) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(
        max_connections = database.max_connections,
        acquire_timeout_secs = database.acquire_timeout_secs,
        "connecting to database"
    );
    pool_options(database).connect(&database.url).await
}
