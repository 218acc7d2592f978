//! courier-api server entry point.
//!
//! Startup is strictly sequenced: configuration, then the database
//! readiness gate, then migrations, and only then the HTTP listener.
//! The listener is never bound against a database that has not yet
//! passed its health probe.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use courier_api::api;
use courier_api::app_state::AppState;
use courier_api::config::CourierConfig;
use courier_api::persistence::PostgresStore;
use courier_api::readiness::{self, ReadinessGate};
use courier_api::service::{MailboxService, UserDirectory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config =
        CourierConfig::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    tracing::info!(addr = %config.listen_addr, "starting courier-api");

    // Lazy pool: no connection is attempted until the readiness probe
    // runs, so the gate observes every connection failure itself.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect_lazy(&config.database_url)
        .context("invalid database URL")?;

    // Hold startup until the database reports healthy. Exhausting the
    // retry budget exits nonzero; restart policy belongs to the outer
    // orchestrator.
    let gate = ReadinessGate::new(config.probe_policy());
    let report = gate
        .wait_for(|| readiness::ping(&pool))
        .await
        .context("database never became ready")?;
    tracing::info!(
        attempts = report.attempts,
        elapsed = ?report.elapsed,
        "database ready"
    );

    // Apply schema migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("failed to apply migrations")?;
    tracing::info!("migrations applied");

    // Build service and application state
    let store = PostgresStore::new(pool.clone());
    let app_state = AppState {
        directory: Arc::new(UserDirectory::new(store.clone())),
        mailbox: Arc::new(MailboxService::new(store)),
        db: pool,
    };

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(app_state);

    #[cfg(feature = "swagger-ui")]
    let app = app.merge(api::swagger_ui());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
