//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! # Create the tower-sessions table used by the storefront
//! cs-cli migrate sessions
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)

use secrecy::SecretString;
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;

use cornerstore_storefront::db;

/// Migration failures.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create the session schema and table if they do not exist.
///
/// # Errors
///
/// Returns an error if no database URL is set or the migration fails.
pub async fn sessions() -> Result<(), MigrationError> {
    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    info!("Connecting to session database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running session migrations...");
    PostgresStore::new(pool).migrate().await?;

    info!("Session migrations complete!");
    println!("Session table ready");
    Ok(())
}
