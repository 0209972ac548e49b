//! Database layer: connection pool, migrations, models, and repositories.
//!
//! Uniqueness and cascade semantics the domain relies on (unique usernames,
//! emails, slugs, one review per author per title, genre links deleted with
//! their title, category deletion nulling `titles.category_id`) are enforced
//! in the migrations, not just pre-checked in code.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

/// The shared PostgreSQL connection pool type.
pub type DbPool = sqlx::PgPool;

/// Default maximum number of pooled connections.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Create a connection pool for the given database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
