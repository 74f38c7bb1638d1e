//! Corner Store Storefront - public shop.
//!
//! This binary serves the catalog, cart and checkout on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework with HTMX (`hx-boost`) for in-place page swaps
//! - Askama templates for server-side rendering
//! - External JSON catalog, cached in memory with `moka`
//! - Cart and checkout state in the visitor's session (tower-sessions),
//!   kept in `PostgreSQL` when `STOREFRONT_DATABASE_URL` is set and in
//!   memory otherwise

#![cfg_attr(not(test), forbid(unsafe_code))]

use cornerstore_storefront::config::StorefrontConfig;
use cornerstore_storefront::state::AppState;
use cornerstore_storefront::{build_router, db};
use sentry::integrations::tracing as sentry_tracing;
use tower_sessions::MemoryStore;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Start Sentry when a DSN is configured. The guard flushes on drop.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Warnings and errors become Sentry events, info and debug breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Sentry goes first so the tracing layer has a client to report to
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let pool = match &config.database_url {
        Some(url) => Some(
            db::create_pool(url)
                .await
                .expect("Failed to connect to session database"),
        ),
        None => None,
    };
    if pool.is_some() {
        tracing::info!("Sessions stored in PostgreSQL");
    } else {
        tracing::warn!("No database configured, sessions are kept in memory");
    }

    // Session table comes from `cs-cli migrate sessions`, never from startup
    let state = AppState::new(config.clone(), pool.clone());
    let app = match pool {
        Some(pool) => build_router(state, PostgresStore::new(pool)),
        None => build_router(state, MemoryStore::default()),
    }
    .layer(sentry_tower::NewSentryLayer::new_from_top())
    .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(
        %addr,
        catalog = %config.catalog.url,
        settlement_delay_ms = %config.payment.settlement_delay.as_millis(),
        "Storefront listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default filter. JSON lines on Fly.io, text
/// locally; warnings and errors also become Sentry events.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "cornerstore_storefront=info,cornerstore_core=info,tower_http=debug".into()
    });

    let json = std::env::var_os("FLY_APP_NAME").is_some();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true)))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

/// Resolve on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.expect("Failed to install Ctrl+C handler"),
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");

    tracing::info!("Shutting down, draining open requests");
}
