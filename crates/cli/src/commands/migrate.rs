//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! grocer-cli migrate
//! ```
//!
//! Migrations live in `crates/web/migrations/` and are embedded in the
//! binary. The web server also applies them at startup.

use super::connect;

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    grocer_web::db::migrate(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
