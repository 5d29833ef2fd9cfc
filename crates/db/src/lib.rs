//! Postgres persistence for boards, lists, tasks, users and activities.
//!
//! Repositories are zero-sized structs with async methods taking `&PgPool`.
//! Queries never renumber sibling positions; see
//! [`taskboard_core::position`] for the ordering contract.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Wrap a domain conversion failure as a row decode error.
pub(crate) fn decode_error(err: taskboard_core::error::CoreError) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}
