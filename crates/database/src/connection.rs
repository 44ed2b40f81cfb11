use crate::error::DbError;
use dotenvy::dotenv;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::env;
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// This function reads `DATABASE_URL` from the environment (loading `.env`
/// if present), creates a connection pool with robust settings, and returns
/// it. This pool can be shared across the entire application.
pub async fn connect() -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url()?)
        .await?;

    Ok(pool)
}

/// Builds the same pool without touching the database.
///
/// The first query pays the connection cost; used by the servers so startup
/// succeeds even while the store is down and the provider layer can fail
/// over per request.
pub fn connect_lazy() -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(&database_url()?)?;

    Ok(pool)
}

/// A utility function to run database migrations automatically.
///
/// This is useful for ensuring the database schema is up-to-date when the
/// application starts, which is especially important in production
/// deployments.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

fn database_url() -> Result<String, DbError> {
    // Load environment variables from the .env file, if one exists.
    dotenv().ok();

    env::var("DATABASE_URL")
        .map_err(|_e| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))
}
