//! Optional `PostgreSQL` connection for session storage.
//!
//! The storefront keeps no tables of its own. When a database URL is
//! configured, sessions (and with them carts and open checkouts) are stored
//! in the `tower_sessions.session` table so they survive restarts and are
//! shared between instances.
//!
//! # Migrations
//!
//! The session table is created explicitly, never on startup:
//! ```bash
//! cargo run -p cornerstore-cli -- migrate sessions
//! ```

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
