//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use grocer_web::config::WebConfig;
use grocer_web::db;
use sqlx::SqlitePool;

/// Connect to the configured database.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the database cannot
/// be opened.
pub async fn connect() -> Result<SqlitePool, Box<dyn std::error::Error>> {
    let config = WebConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;
    Ok(pool)
}
